use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::group::check_coords;
use crate::*;

/// Owns the grid of a session and every state transition on it.
///
/// Between public calls every cell is occupied; `remove_group` is the only operation that
/// leaves holes, and `compact_all` fills them again.
#[derive(Clone, Debug)]
pub struct Board<R = SmallRng> {
    config: BoardConfig,
    grid: Array2<Cell>,
    rng: R,
}

impl Board<SmallRng> {
    /// Random board seeded from `seed`, reshuffled if it starts without a move.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Board from a hand-made layout of shape `(width, height)`, indexed `[x, y]`.
    ///
    /// The layout is taken as is, it may be deadlocked or contain empty cells.
    pub fn from_layout(
        config: BoardConfig,
        layout: Array2<Option<ColorToken>>,
        seed: u64,
    ) -> Result<Self> {
        Self::from_layout_with_rng(config, layout, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Board<R> {
    pub fn with_rng(config: BoardConfig, mut rng: R) -> Result<Self> {
        check_config(&config)?;

        let colors = &config.colors;
        let grid = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
            let color = colors[rng.random_range(0..colors.len())];
            Cell::new((x as Coord, y as Coord), Some(color))
        });

        let mut board = Self { config, grid, rng };
        if !board.has_any_move() {
            let resolution = resolve_deadlock(&mut board.grid, &mut board.rng)?;
            log::debug!("Initial board had no move: {:?}", resolution);
        }
        Ok(board)
    }

    pub fn from_layout_with_rng(
        config: BoardConfig,
        layout: Array2<Option<ColorToken>>,
        rng: R,
    ) -> Result<Self> {
        check_config(&config)?;
        let (width, height) = config.size;
        if layout.dim() != (usize::from(width), usize::from(height)) {
            return Err(BoardError::InvalidBoardShape);
        }

        let grid = Array2::from_shape_fn(layout.dim(), |(x, y)| {
            Cell::new((x as Coord, y as Coord), layout[[x, y]])
        });
        Ok(Self { config, grid, rng })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        check_coords(&self.grid, coords)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<&Cell> {
        self.grid.get(coords.to_nd_index())
    }

    pub fn color_at(&self, coords: Coord2) -> Option<ColorToken> {
        self.cell_at(coords).and_then(Cell::occupant)
    }

    /// Cells in column-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter()
    }

    pub fn grid(&self) -> &Array2<Cell> {
        &self.grid
    }

    pub fn layout(&self) -> Array2<Option<ColorToken>> {
        self.grid.map(Cell::occupant)
    }

    pub fn occupied_count(&self) -> CellCount {
        self.grid
            .iter()
            .filter(|cell| !cell.is_empty())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn empty_count(&self) -> CellCount {
        self.config.total_cells() - self.occupied_count()
    }

    pub fn color_counts(&self) -> BTreeMap<ColorToken, CellCount> {
        let mut counts = BTreeMap::new();
        for color in self.grid.iter().filter_map(Cell::occupant) {
            *counts.entry(color).or_insert(0) += 1;
        }
        counts
    }

    pub fn get_group(&self, coords: Coord2) -> Result<Group> {
        GroupFinder::new(&self.grid).find(coords)
    }

    pub fn has_any_move(&self) -> bool {
        has_any_move(&self.grid)
    }

    /// Tier of the group containing `coords`, `None` for an empty cell.
    pub fn tier_at(&self, coords: Coord2) -> Result<Option<Tier>> {
        let group = self.get_group(coords)?;
        Ok(group
            .color()
            .map(|_| self.config.tiers.tier_for(group.size())))
    }

    pub fn tier_map(&self) -> Array2<Option<Tier>> {
        let mut tiers = Array2::from_elem(self.grid.dim(), None);
        for group in GroupFinder::new(&self.grid).groups() {
            let tier = self.config.tiers.tier_for(group.size());
            for &coords in group.cells() {
                tiers[coords.to_nd_index()] = Some(tier);
            }
        }
        tiers
    }

    /// Full visual state of the board, one entry per cell in column-major order.
    pub fn refresh(&self) -> Vec<CellChange> {
        let tiers = self.tier_map();
        self.grid
            .iter()
            .zip(tiers.iter())
            .map(|(cell, &tier)| CellChange {
                coords: cell.coords(),
                occupant: cell.occupant(),
                tier,
            })
            .collect()
    }

    /// Empties every listed cell without compacting.
    ///
    /// All cells are checked before anything is cleared: an out-of-bounds entry fails with
    /// `InvalidCoords`, an empty or repeated entry with `InvalidState`.
    pub fn remove_group(&mut self, cells: &[Coord2]) -> Result<()> {
        let mut seen = Array2::from_elem(self.grid.dim(), false);
        for &coords in cells {
            let index = self.validate_coords(coords)?.to_nd_index();
            if self.grid[index].is_empty() || seen[index] {
                log::warn!("Cannot remove {:?}, cell is already empty", coords);
                return Err(BoardError::InvalidState);
            }
            seen[index] = true;
        }

        for &coords in cells {
            self.grid[coords.to_nd_index()].take_occupant();
        }
        log::debug!("Removed {} cells", cells.len());
        Ok(())
    }

    /// Drops the occupants of column `x` to the bottom, keeping their order, then spawns new
    /// occupants into the rows left empty, lowest row first.
    pub fn compact_column(&mut self, x: Coord) -> Result<Vec<CellMove>> {
        if x >= self.config.width() {
            return Err(BoardError::InvalidCoords);
        }
        Ok(self.compact_column_unchecked(x))
    }

    /// Compacts every column, columns never interact.
    pub fn compact_all(&mut self) -> Vec<CellMove> {
        (0..self.config.width())
            .flat_map(|x| self.compact_column_unchecked(x))
            .collect()
    }

    fn compact_column_unchecked(&mut self, x: Coord) -> Vec<CellMove> {
        let height = self.config.height();
        let mut moves = Vec::new();

        let mut write_y: Coord = 0;
        for y in 0..height {
            let Some(color) = self.grid[(x, y).to_nd_index()].occupant() else {
                continue;
            };
            if y != write_y {
                self.grid[(x, y).to_nd_index()].take_occupant();
                self.grid[(x, write_y).to_nd_index()].set_occupant(Some(color));
                moves.push(CellMove {
                    column: x,
                    from_row: y.into(),
                    to_row: write_y,
                    color,
                    kind: MoveKind::Fall,
                });
            }
            write_y += 1;
        }

        let mut entry_row = CellCount::from(height);
        for y in write_y..height {
            let color = self.spawn_color();
            self.grid[(x, y).to_nd_index()].set_occupant(Some(color));
            moves.push(CellMove {
                column: x,
                from_row: entry_row,
                to_row: y,
                color,
                kind: MoveKind::Spawn,
            });
            entry_row += 1;
        }

        if !moves.is_empty() {
            log::trace!(
                "Column {} compacted, {} spawned",
                x,
                height - write_y
            );
        }
        moves
    }

    pub fn resolve_deadlock(&mut self) -> Result<Resolution> {
        self.resolve_deadlock_observed(&mut ())
    }

    /// Reshuffles a deadlocked board and reports the full refreshed state.
    pub fn resolve_deadlock_observed(
        &mut self,
        observer: &mut impl BoardObserver,
    ) -> Result<Resolution> {
        let resolution = self.resolve(observer)?;
        if resolution != Resolution::AlreadyPlayable {
            observer.on_event(&BoardEvent::CellsChanged(self.refresh()));
        }
        Ok(resolution)
    }

    pub fn click_cell(&mut self, coords: Coord2) -> Result<ClickOutcome> {
        self.click_cell_observed(coords, &mut ())
    }

    /// Removes the group under `coords` if it is large enough, refills the board and makes sure
    /// a move remains.
    ///
    /// Events are emitted in order: `Removed`, `Moved`, then `CellsChanged` with every cell of the
    /// compacted board. When that board has no move, `DeadlockResolved` follows with a second
    /// `CellsChanged` for the reshuffled board. Only `Unresolvable` is returned as an error.
    pub fn click_cell_observed(
        &mut self,
        coords: Coord2,
        observer: &mut impl BoardObserver,
    ) -> Result<ClickOutcome> {
        let Ok(coords) = self.validate_coords(coords) else {
            log::debug!("Click outside the board at {:?}", coords);
            return Ok(ClickOutcome::NoOp);
        };

        let group = self.get_group(coords)?;
        if group.is_empty() {
            return Ok(ClickOutcome::NoOp);
        }
        if group.len() < MIN_GROUP_SIZE {
            log::debug!("Click at {:?}, group too small", coords);
            return Ok(ClickOutcome::NoMatch);
        }

        log::debug!(
            "Click at {:?}, removing {} cells of {:?}",
            coords,
            group.len(),
            group.color()
        );
        self.remove_group(group.cells())?;
        observer.on_event(&BoardEvent::Removed(group.cells().to_vec()));

        let moves = self.compact_all();
        observer.on_event(&BoardEvent::Moved(moves.clone()));

        observer.on_event(&BoardEvent::CellsChanged(self.refresh()));

        let resolution = if self.has_any_move() {
            None
        } else {
            Some(self.resolve_deadlock_observed(observer)?)
        };

        Ok(ClickOutcome::Matched {
            removed: group,
            moves,
            resolution,
        })
    }

    fn resolve(&mut self, observer: &mut impl BoardObserver) -> Result<Resolution> {
        match resolve_deadlock(&mut self.grid, &mut self.rng) {
            Ok(Resolution::AlreadyPlayable) => Ok(Resolution::AlreadyPlayable),
            Ok(resolution) => {
                observer.on_event(&BoardEvent::DeadlockResolved(resolution));
                Ok(resolution)
            }
            Err(err) => {
                observer.on_event(&BoardEvent::Unresolvable);
                Err(err)
            }
        }
    }

    fn spawn_color(&mut self) -> ColorToken {
        let colors = &self.config.colors;
        colors[self.rng.random_range(0..colors.len())]
    }
}

fn check_config(config: &BoardConfig) -> Result<()> {
    config.validate()?;
    if config.is_resolvable() {
        Ok(())
    } else {
        log::warn!("Board of size {:?} cannot be patched", config.size);
        Err(BoardError::Unresolvable)
    }
}
