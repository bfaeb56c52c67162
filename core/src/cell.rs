use serde::{Deserialize, Serialize};

use crate::*;

/// A grid slot. Its coordinates are fixed at creation, only the occupant moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    coords: Coord2,
    occupant: Option<ColorToken>,
}

impl Cell {
    pub(crate) const fn new(coords: Coord2, occupant: Option<ColorToken>) -> Self {
        Self { coords, occupant }
    }

    pub const fn coords(&self) -> Coord2 {
        self.coords
    }

    pub const fn occupant(&self) -> Option<ColorToken> {
        self.occupant
    }

    pub const fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<ColorToken>) {
        self.occupant = occupant;
    }

    pub(crate) fn take_occupant(&mut self) -> Option<ColorToken> {
        self.occupant.take()
    }
}
