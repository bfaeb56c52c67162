use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for group sizes, cell totals and spawn entry rows.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`, with `y = 0` as the bottom row.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Dimensions of an `Array2` indexed as `[x, y]`.
pub(crate) fn grid_size<T>(grid: &Array2<T>) -> Coord2 {
    let dim = grid.dim();
    (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        NeighborIter::new(index, grid_size(self))
    }
}

/// Orthogonal neighbor order: up, down, left, right.
const DISPLACEMENTS: [(i8, i8); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// In-bounds 4-connected neighbors of a cell.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_has_two_neighbors() {
        let grid: Array2<u8> = Array2::default((3, 3));
        let neighbors: Vec<_> = grid.iter_neighbors((0, 0)).collect();
        assert_eq!(neighbors, [(0, 1), (1, 0)]);
    }

    #[test]
    fn center_neighbors_follow_fixed_order() {
        let grid: Array2<u8> = Array2::default((3, 3));
        let neighbors: Vec<_> = grid.iter_neighbors((1, 1)).collect();
        assert_eq!(neighbors, [(1, 2), (1, 0), (0, 1), (2, 1)]);
    }

    #[test]
    fn grid_size_matches_dimensions() {
        let grid: Array2<u8> = Array2::default((255, 2));
        assert_eq!(grid_size(&grid), (255, 2));
    }

    #[test]
    fn single_cell_grid_has_no_neighbors() {
        let grid: Array2<u8> = Array2::default((1, 1));
        assert_eq!(grid.iter_neighbors((0, 0)).count(), 0);
    }
}
