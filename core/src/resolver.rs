use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::group::check_coords;
use crate::*;

/// How a deadlock pass ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The board already had a move, nothing was touched.
    AlreadyPlayable,
    /// One shuffle was enough.
    Shuffled,
    /// The shuffle left no move and `(0, 1)` was forced to match `(0, 0)`.
    ///
    /// `conserved` is false when the color of `(0, 0)` was unique and had to be duplicated,
    /// changing the color counts on the board.
    Patched { conserved: bool },
}

/// Makes a deadlocked grid playable: shuffle once, patch once, done.
pub fn resolve_deadlock<R: Rng>(grid: &mut Array2<Cell>, rng: &mut R) -> Result<Resolution> {
    if has_any_move(grid) {
        return Ok(Resolution::AlreadyPlayable);
    }

    log::debug!("Deadlock detected, shuffling");
    reshuffle(grid, rng);
    if has_any_move(grid) {
        log::debug!("Board shuffled");
        return Ok(Resolution::Shuffled);
    }

    log::debug!("No move after shuffle, patching (0, 1)");
    let conserved = patch(grid)?;
    if has_any_move(grid) {
        Ok(Resolution::Patched { conserved })
    } else {
        log::warn!("Board still has no move after patching");
        Err(BoardError::Unresolvable)
    }
}

/// Redistributes the occupants over the occupied cells with a uniform Fisher-Yates permutation.
///
/// Occupants are collected and written back in the same column-major order, so the color
/// counts are preserved and empty cells stay empty.
pub fn reshuffle<R: Rng>(grid: &mut Array2<Cell>, rng: &mut R) {
    let mut colors: Vec<ColorToken> = grid.iter().filter_map(Cell::occupant).collect();

    for i in (1..colors.len()).rev() {
        let j = rng.random_range(0..=i);
        colors.swap(i, j);
    }

    let occupied = grid.iter_mut().filter(|cell| !cell.is_empty());
    for (cell, color) in occupied.zip(colors) {
        cell.set_occupant(Some(color));
    }
}

/// Forces `(0, 1)` to hold the color of `(0, 0)`.
///
/// Prefers swapping with another cell of that color so the counts stay intact, and only
/// overwrites when no such cell exists. Returns whether the counts were conserved.
fn patch(grid: &mut Array2<Cell>) -> Result<bool> {
    const ANCHOR: Coord2 = (0, 0);
    const TARGET: Coord2 = (0, 1);

    if check_coords(grid, TARGET).is_err() {
        log::warn!("Board has a single row, no patch is possible");
        return Err(BoardError::Unresolvable);
    }
    let (Some(color), Some(displaced)) = (
        grid[ANCHOR.to_nd_index()].occupant(),
        grid[TARGET.to_nd_index()].occupant(),
    ) else {
        log::warn!("Patch cells are empty, no patch is possible");
        return Err(BoardError::Unresolvable);
    };

    let donor = grid
        .iter()
        .map(Cell::coords)
        .filter(|&coords| coords != ANCHOR && coords != TARGET)
        .find(|&coords| grid[coords.to_nd_index()].occupant() == Some(color));

    grid[TARGET.to_nd_index()].set_occupant(Some(color));
    match donor {
        Some(donor) => {
            grid[donor.to_nd_index()].set_occupant(Some(displaced));
            Ok(true)
        }
        None => {
            log::warn!(
                "Color {:?} is unique, overwriting {:?} at {:?}",
                color,
                displaced,
                TARGET
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use rand::rngs::SmallRng;

    fn grid(width: usize, height: usize, color: impl Fn(usize, usize) -> u8) -> Array2<Cell> {
        Array2::from_shape_fn((width, height), |(x, y)| {
            Cell::new((x as Coord, y as Coord), Some(ColorToken(color(x, y))))
        })
    }

    fn counts(grid: &Array2<Cell>) -> BTreeMap<ColorToken, usize> {
        let mut counts = BTreeMap::new();
        for color in grid.iter().filter_map(Cell::occupant) {
            *counts.entry(color).or_default() += 1;
        }
        counts
    }

    /// Checkerboard of two colors: no two neighbors match.
    fn checkerboard(width: usize, height: usize) -> Array2<Cell> {
        grid(width, height, |x, y| ((x + y) % 2) as u8)
    }

    #[test]
    fn reshuffle_conserves_color_counts() {
        let mut grid = grid(7, 5, |x, y| ((x * 3 + y) % 4) as u8);
        let before = counts(&grid);
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..20 {
            reshuffle(&mut grid, &mut rng);
            assert_eq!(counts(&grid), before);
        }
    }

    #[test]
    fn reshuffle_keeps_empty_cells_in_place() {
        let mut grid = grid(3, 3, |x, _| x as u8);
        grid[[1, 2]].set_occupant(None);
        grid[[2, 0]].set_occupant(None);
        let mut rng = SmallRng::seed_from_u64(1);

        reshuffle(&mut grid, &mut rng);

        assert!(grid[[1, 2]].is_empty());
        assert!(grid[[2, 0]].is_empty());
        assert_eq!(grid.iter().filter(|cell| cell.is_empty()).count(), 2);
    }

    #[test]
    fn reshuffle_keeps_coordinates() {
        let mut grid = checkerboard(4, 4);
        let mut rng = SmallRng::seed_from_u64(3);
        reshuffle(&mut grid, &mut rng);

        for ((x, y), cell) in grid.indexed_iter() {
            assert_eq!(cell.coords(), (x as Coord, y as Coord));
        }
    }

    #[test]
    fn resolve_leaves_playable_board_untouched() {
        let mut grid = grid(3, 3, |_, y| y as u8);
        let before = grid.clone();
        let mut rng = SmallRng::seed_from_u64(0);

        assert_eq!(
            resolve_deadlock(&mut grid, &mut rng),
            Ok(Resolution::AlreadyPlayable)
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn resolve_always_ends_playable() {
        for seed in 0..50 {
            let mut grid = checkerboard(5, 4);
            let mut rng = SmallRng::seed_from_u64(seed);

            let resolution = resolve_deadlock(&mut grid, &mut rng).unwrap();

            assert_ne!(resolution, Resolution::AlreadyPlayable);
            assert!(has_any_move(&grid), "seed {seed}");
        }
    }

    #[test]
    fn all_distinct_colors_are_patched_by_overwriting() {
        let mut grid = grid(2, 2, |x, y| (x * 2 + y) as u8);
        let mut rng = SmallRng::seed_from_u64(11);

        let resolution = resolve_deadlock(&mut grid, &mut rng).unwrap();

        assert_eq!(resolution, Resolution::Patched { conserved: false });
        assert_eq!(grid[[0, 0]].occupant(), grid[[0, 1]].occupant());
        assert!(has_any_move(&grid));
    }

    #[test]
    fn patch_swaps_with_donor_when_color_repeats() {
        // (0,0)=0 (0,1)=1 (1,0)=2 (1,1)=0 (2,0)=3 (2,1)=4
        let mut grid = grid(3, 2, |x, y| [[0, 1], [2, 0], [3, 4]][x][y]);
        let before = counts(&grid);

        assert_eq!(patch(&mut grid), Ok(true));

        assert_eq!(grid[[0, 1]].occupant(), Some(ColorToken(0)));
        assert_eq!(grid[[1, 1]].occupant(), Some(ColorToken(1)));
        assert_eq!(counts(&grid), before);
    }

    #[test]
    fn single_row_deadlock_is_unresolvable() {
        let mut grid = grid(3, 1, |x, _| x as u8);
        let mut rng = SmallRng::seed_from_u64(5);

        assert_eq!(
            resolve_deadlock(&mut grid, &mut rng),
            Err(BoardError::Unresolvable)
        );
    }
}
