//! Settle engine crate - the live game the autoplayer drives.
//!
//! A [`Game`] owns the locked grid, the falling piece and a seeded piece
//! source. Actions move the piece, ticks apply gravity and lock it.

pub mod bag;
pub mod config;
pub mod game;

pub use bag::PieceSource;
pub use config::{ConfigError, GameConfig, PieceRule};
pub use game::{Game, GameStats, TickOutcome};
