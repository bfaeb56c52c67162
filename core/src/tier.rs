use serde::{Deserialize, Serialize};

use crate::*;

/// Display classification of a group by its size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Base,
    A,
    B,
    C,
}

impl Default for Tier {
    fn default() -> Self {
        Self::Base
    }
}

/// Ordered group-size thresholds, a group of `size >= a` is at least tier A and so on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub a: CellCount,
    pub b: CellCount,
    pub c: CellCount,
}

impl TierThresholds {
    pub fn new(a: CellCount, b: CellCount, c: CellCount) -> Result<Self> {
        let tiers = Self { a, b, c };
        tiers.validate()?;
        Ok(tiers)
    }

    pub fn validate(&self) -> Result<()> {
        if 1 <= self.a && self.a <= self.b && self.b <= self.c {
            Ok(())
        } else {
            Err(BoardError::InvalidTiers)
        }
    }

    /// Highest tier whose threshold does not exceed `group_size`.
    pub const fn tier_for(&self, group_size: CellCount) -> Tier {
        if group_size >= self.c {
            Tier::C
        } else if group_size >= self.b {
            Tier::B
        } else if group_size >= self.a {
            Tier::A
        } else {
            Tier::Base
        }
    }
}
