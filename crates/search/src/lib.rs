//! Settle search crate - where to put the live piece and how to get it there.
//!
//! [`PlacementSearch`] runs a reachability BFS for each piece of the
//! lookahead queue and recurses through the queue, scoring the final grid of
//! every line with `settle-eval`. [`Solver`] turns the winning path into
//! inputs for a [`LiveBoard`].

mod config;
mod error;
mod recording;
mod search;
mod solver;
mod state_space;

pub use config::{ConfigError, SolverConfig};
pub use error::SearchError;
pub use recording::{Playback, Recording};
pub use search::{PlacementSearch, SearchOutcome};
pub use solver::{LiveBoard, Solver, SolverStats, Step};
pub use state_space::{PlacementState, StateId, StateSpace};
