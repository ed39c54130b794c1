use thiserror::Error;

/// Why a placement search produced nothing to play.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("lookahead queue is empty")]
    EmptyQueue,
    #[error("live piece already collides with the grid")]
    SeedCollides,
    #[error("queue piece {index} at ({x}, {y}) lies outside the search area")]
    SeedOutOfBounds { index: usize, x: i32, y: i32 },
    #[error("every reachable placement tops out")]
    NoPlacement,
}
