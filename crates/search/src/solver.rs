//! Drives a live board: search once per spawned piece, then play inputs
//! back one per call.

use serde::Serialize;
use settle_core::{Action, Grid, Piece};
use settle_engine::{Game, TickOutcome};
use tracing::debug;

use crate::config::SolverConfig;
use crate::recording::{Playback, Recording};
use crate::search::PlacementSearch;

/// What the solver needs from a running game.
pub trait LiveBoard {
    /// Changes whenever a new piece spawns.
    fn piece_id(&self) -> u64;
    fn current_piece(&self) -> Piece;
    /// Up to `n` upcoming pieces at their spawn positions.
    fn upcoming(&self, n: usize) -> Vec<Piece>;
    fn grid(&self) -> &Grid;
    fn collides(&self, piece: &Piece) -> bool;
    /// Apply an input, reverting it on collision. Returns whether it stuck.
    fn perform_action(&mut self, action: Action) -> bool;
    fn tick(&mut self) -> TickOutcome;
}

impl LiveBoard for Game {
    fn piece_id(&self) -> u64 {
        Game::piece_id(self)
    }

    fn current_piece(&self) -> Piece {
        self.current()
    }

    fn upcoming(&self, n: usize) -> Vec<Piece> {
        Game::upcoming(self, n)
    }

    fn grid(&self) -> &Grid {
        Game::grid(self)
    }

    fn collides(&self, piece: &Piece) -> bool {
        Game::collides(self, piece)
    }

    fn perform_action(&mut self, action: Action) -> bool {
        Game::perform_action(self, action)
    }

    fn tick(&mut self) -> TickOutcome {
        Game::tick(self)
    }
}

/// What one [`Solver::advance`] call did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Acted { action: Action, applied: bool },
    Ticked(TickOutcome),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolverStats {
    pub searches: u64,
    pub failed_searches: u64,
    pub actions: u64,
    pub failed_actions: u64,
    /// Recordings dropped before they finished playing.
    pub flushed: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
    searched_piece: Option<u64>,
    recording: Recording,
    target: Option<Piece>,
    stats: SolverStats,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn stats(&self) -> SolverStats {
        self.stats
    }

    /// Placement the current recording is heading for.
    pub fn target(&self) -> Option<Piece> {
        self.target
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Search if a new piece has spawned, then play one step.
    pub fn advance<B: LiveBoard>(&mut self, board: &mut B) -> Step {
        let piece_id = board.piece_id();
        let live = board.current_piece();
        if self.searched_piece != Some(piece_id) && !board.collides(&live) {
            self.searched_piece = Some(piece_id);
            self.replan(board, live);
        }

        match self.recording.next_step() {
            Playback::Act(action) => {
                let applied = board.perform_action(action);
                self.stats.actions += 1;
                if !applied {
                    self.stats.failed_actions += 1;
                }
                Step::Acted { action, applied }
            }
            Playback::Drop | Playback::Idle => Step::Ticked(board.tick()),
        }
    }

    fn replan<B: LiveBoard>(&mut self, board: &B, live: Piece) {
        if !self.recording.is_empty() {
            debug!(
                actions = self.recording.actions(),
                drops = self.recording.drops(),
                "flushing unfinished recording"
            );
            self.stats.flushed += 1;
        }

        let mut queue = Vec::with_capacity(self.config.lookahead);
        queue.push(live);
        queue.extend(board.upcoming(self.config.lookahead.saturating_sub(1)));

        match PlacementSearch::run(board.grid(), &queue) {
            Ok(outcome) => {
                self.stats.searches += 1;
                self.recording = outcome.recording();
                self.target = Some(outcome.placement);
            }
            Err(err) => {
                self.stats.failed_searches += 1;
                debug!(%err, "no placement to play");
                self.recording.clear();
                self.target = None;
            }
        }
    }
}
