use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("lookahead must be within {min}..={max}, got {actual}")]
    Lookahead { actual: usize, min: usize, max: usize },
}

/// Solver settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Pieces considered per search: the live piece plus `lookahead - 1`
    /// upcoming ones.
    pub lookahead: usize,
}

impl SolverConfig {
    pub const MIN_LOOKAHEAD: usize = 1;
    pub const MAX_LOOKAHEAD: usize = 4;

    pub fn new(lookahead: usize) -> Result<Self, ConfigError> {
        let config = Self { lookahead };
        config.validate()?;
        Ok(config)
    }

    /// Only the live piece.
    pub fn greedy() -> Self {
        Self { lookahead: 1 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_LOOKAHEAD..=Self::MAX_LOOKAHEAD).contains(&self.lookahead) {
            return Err(ConfigError::Lookahead {
                actual: self.lookahead,
                min: Self::MIN_LOOKAHEAD,
                max: Self::MAX_LOOKAHEAD,
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { lookahead: 2 }
    }
}
