use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::grid_size;
use crate::*;

/// Maximal 4-connected set of cells sharing one color.
///
/// Cells are kept in discovery order: the start cell first, then every cell in the order the
/// depth-first traversal admitted it, probing neighbors up, down, left, right.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    color: Option<ColorToken>,
    cells: Vec<Coord2>,
}

impl Group {
    pub const fn empty() -> Self {
        Self {
            color: None,
            cells: Vec::new(),
        }
    }

    pub const fn color(&self) -> Option<ColorToken> {
        self.color
    }

    pub fn cells(&self) -> &[Coord2] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<Coord2> {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Group size as used for tier lookup.
    pub fn size(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    /// Linear scan over the cells, collect them into a mask when testing many coordinates.
    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }
}

pub(crate) fn check_coords<T>(grid: &Array2<T>, coords: Coord2) -> Result<Coord2> {
    let size = grid_size(grid);
    if coords.0 < size.0 && coords.1 < size.1 {
        Ok(coords)
    } else {
        Err(BoardError::InvalidCoords)
    }
}

/// Connected-component lookup over a borrowed grid.
#[derive(Debug)]
pub struct GroupFinder<'a> {
    grid: &'a Array2<Cell>,
}

impl<'a> GroupFinder<'a> {
    pub fn new(grid: &'a Array2<Cell>) -> Self {
        Self { grid }
    }

    /// Group containing `start`, empty when `start` holds no occupant.
    pub fn find(&self, start: Coord2) -> Result<Group> {
        let start = check_coords(self.grid, start)?;
        let mut visited = Array2::from_elem(self.grid.dim(), false);
        Ok(self.collect(start, &mut visited))
    }

    /// Partitions every occupied cell into groups, in column-major order of their first cell.
    pub fn groups(&self) -> Vec<Group> {
        let mut visited = Array2::from_elem(self.grid.dim(), false);
        let mut groups = Vec::new();

        for cell in self.grid.iter() {
            let coords = cell.coords();
            if cell.is_empty() || visited[coords.to_nd_index()] {
                continue;
            }
            groups.push(self.collect(coords, &mut visited));
        }

        groups
    }

    /// Only cells admitted to a group are marked, so one mask can be shared across groups.
    fn collect(&self, start: Coord2, visited: &mut Array2<bool>) -> Group {
        let Some(color) = self.grid[start.to_nd_index()].occupant() else {
            return Group::empty();
        };

        visited[start.to_nd_index()] = true;
        let mut cells = vec![start];
        let mut to_visit = vec![start];

        while let Some(current) = to_visit.pop() {
            for neighbor in self.grid.iter_neighbors(current) {
                let index = neighbor.to_nd_index();
                if !visited[index] && self.grid[index].occupant() == Some(color) {
                    visited[index] = true;
                    cells.push(neighbor);
                    to_visit.push(neighbor);
                }
            }
        }

        log::trace!("Group at {:?}: {} cells of {:?}", start, cells.len(), color);
        Group {
            color: Some(color),
            cells,
        }
    }
}

/// Whether any two orthogonally adjacent occupied cells share a color.
///
/// Checking only the right and upper neighbor of every cell covers each adjacent pair once.
pub fn has_any_move(grid: &Array2<Cell>) -> bool {
    let (width, height) = grid_size(grid);

    grid.iter().any(|cell| {
        let Some(color) = cell.occupant() else {
            return false;
        };
        let (x, y) = cell.coords();

        let same = |coords: Coord2| grid[coords.to_nd_index()].occupant() == Some(color);
        (x + 1 < width && same((x + 1, y))) || (y + 1 < height && same((x, y + 1)))
    })
}
