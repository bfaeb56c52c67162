use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Level asset: board shape, tier thresholds and the palette a session samples its colors from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub size: Coord2,
    pub tiers: TierThresholds,
    pub palette: Vec<ColorToken>,
    /// How many distinct palette colors each session plays with.
    pub color_count: u8,
}

impl LevelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.color_count == 0 {
            return Err(BoardError::NoColors);
        }
        if self.distinct_palette().len() < usize::from(self.color_count) {
            return Err(BoardError::PaletteTooSmall);
        }
        self.tiers.validate()
    }

    /// Picks `color_count` distinct palette colors uniformly for a new session.
    pub fn session_config<R: Rng>(&self, rng: &mut R) -> Result<BoardConfig> {
        self.validate()?;
        let palette = self.distinct_palette();
        let colors: Vec<ColorToken> = palette
            .choose_multiple(rng, usize::from(self.color_count))
            .copied()
            .collect();
        log::debug!("Session colors: {:?}", colors);
        BoardConfig::new(self.size, self.tiers, colors)
    }

    fn distinct_palette(&self) -> Vec<ColorToken> {
        let mut palette = Vec::with_capacity(self.palette.len());
        for &color in &self.palette {
            if !palette.contains(&color) {
                palette.push(color);
            }
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    fn level(palette: &[u8], color_count: u8) -> LevelConfig {
        LevelConfig {
            size: (6, 5),
            tiers: TierThresholds::new(4, 7, 9).unwrap(),
            palette: palette.iter().copied().map(ColorToken).collect(),
            color_count,
        }
    }

    #[test]
    fn session_samples_distinct_palette_colors() {
        let level = level(&[0, 1, 2, 3, 4, 5], 4);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..10 {
            let config = level.session_config(&mut rng).unwrap();
            assert_eq!(config.size, (6, 5));
            assert_eq!(config.colors.len(), 4);
            assert!(config.colors.iter().all(|color| level.palette.contains(color)));
        }
    }

    #[test]
    fn duplicate_palette_entries_count_once() {
        let level = level(&[1, 1, 2], 3);
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(
            level.session_config(&mut rng),
            Err(BoardError::PaletteTooSmall)
        );
    }

    #[test]
    fn zero_color_count_is_rejected() {
        assert_eq!(level(&[1, 2], 0).validate(), Err(BoardError::NoColors));
    }
}
