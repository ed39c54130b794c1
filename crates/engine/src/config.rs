//! Live game configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How upcoming shapes are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceRule {
    /// Each shape independently with equal probability.
    #[default]
    Uniform,
    /// Shuffled permutations of all seven shapes.
    SevenBag,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least {min_width}x{min_height}, got {width}x{height}")]
    GridTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Upcoming shapes kept visible beyond the live piece.
    pub preview: usize,
    pub piece_rule: PieceRule,
    pub seed: u64,
}

impl GameConfig {
    /// Narrowest grid where every shape spawns inside the walls.
    pub const MIN_WIDTH: usize = 8;
    pub const MIN_HEIGHT: usize = 4;

    /// 10x20, one preview piece, uniform draws.
    pub fn classic() -> Self {
        Self {
            width: 10,
            height: 20,
            preview: 1,
            piece_rule: PieceRule::Uniform,
            seed: 0,
        }
    }

    pub fn seven_bag() -> Self {
        Self {
            piece_rule: PieceRule::SevenBag,
            ..Self::classic()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_preview(mut self, preview: usize) -> Self {
        self.preview = preview;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < Self::MIN_WIDTH || self.height < Self::MIN_HEIGHT {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min_width: Self::MIN_WIDTH,
                min_height: Self::MIN_HEIGHT,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_is_valid() {
        let config = GameConfig::classic();
        assert_eq!((config.width, config.height, config.preview), (10, 20, 1));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_too_narrow() {
        let config = GameConfig {
            width: 6,
            ..GameConfig::classic()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooSmall { width: 6, .. })
        ));
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::seven_bag().with_seed(9).with_preview(3);
        assert_eq!(config.piece_rule, PieceRule::SevenBag);
        assert_eq!(config.seed, 9);
        assert_eq!(config.preview, 3);
    }
}
