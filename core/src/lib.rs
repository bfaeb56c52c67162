#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use events::*;
pub use group::*;
pub use level::*;
pub use resolver::*;
pub use tier::*;
pub use types::*;

mod board;
mod cell;
mod error;
mod events;
mod group;
mod level;
mod resolver;
mod tier;
mod types;

/// Smallest group a click is allowed to remove.
pub const MIN_GROUP_SIZE: usize = 2;

/// Opaque color category, only equality matters for grouping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(pub u8);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub size: Coord2,
    pub tiers: TierThresholds,
    /// Colors drawn from when filling and spawning.
    pub colors: Vec<ColorToken>,
}

impl BoardConfig {
    pub fn new(
        size: Coord2,
        tiers: TierThresholds,
        colors: impl IntoIterator<Item = ColorToken>,
    ) -> Result<Self> {
        let mut unique = Vec::new();
        for color in colors {
            if !unique.contains(&color) {
                unique.push(color);
            }
        }
        let config = Self {
            size,
            tiers,
            colors: unique,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(BoardError::InvalidSize);
        }
        if self.colors.is_empty() {
            return Err(BoardError::NoColors);
        }
        self.tiers.validate()
    }

    /// The emergency patch pairs `(0, 0)` with `(0, 1)`, so it needs two rows.
    pub const fn is_resolvable(&self) -> bool {
        self.size.1 >= 2
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Out of bounds or empty cell.
    NoOp,
    /// Group smaller than [`MIN_GROUP_SIZE`], nothing changed.
    NoMatch,
    Matched {
        removed: Group,
        moves: Vec<CellMove>,
        /// Set when the click left the board deadlocked and it was reshuffled.
        resolution: Option<Resolution>,
    },
}

impl ClickOutcome {
    pub const fn has_update(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub const fn was_resolved(&self) -> bool {
        matches!(
            self,
            Self::Matched {
                resolution: Some(_),
                ..
            }
        )
    }

    pub fn removed(&self) -> Option<&Group> {
        match self {
            Self::Matched { removed, .. } => Some(removed),
            Self::NoOp | Self::NoMatch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> TierThresholds {
        TierThresholds::new(4, 6, 8).unwrap()
    }

    #[test]
    fn config_deduplicates_colors() {
        let config = BoardConfig::new(
            (3, 3),
            tiers(),
            [ColorToken(1), ColorToken(2), ColorToken(1)],
        )
        .unwrap();
        assert_eq!(config.colors, [ColorToken(1), ColorToken(2)]);
    }

    #[test]
    fn config_rejects_degenerate_input() {
        assert_eq!(
            BoardConfig::new((0, 3), tiers(), [ColorToken(0)]),
            Err(BoardError::InvalidSize)
        );
        assert_eq!(
            BoardConfig::new((3, 3), tiers(), []),
            Err(BoardError::NoColors)
        );
    }

    #[test]
    fn single_row_is_not_resolvable() {
        let config = BoardConfig::new((5, 1), tiers(), [ColorToken(0)]).unwrap();
        assert!(!config.is_resolvable());
        assert_eq!(config.total_cells(), 5);
    }
}
