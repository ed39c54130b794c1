//! The live game: one falling piece, a preview queue and the locked grid.

use std::collections::VecDeque;

use serde::Serialize;
use settle_core::{Action, Grid, Piece, Shape, SPAWN_Y};
use tracing::debug;

use crate::bag::PieceSource;
use crate::config::{ConfigError, GameConfig};

/// What a single gravity tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TickOutcome {
    /// The piece moved one row down.
    Fell,
    /// The piece locked; `rows` lines cleared and the next piece spawned.
    Locked { rows: u32 },
    /// The piece could not lock inside the grid. The game is over.
    ToppedOut,
    /// Tick on a finished game.
    GameOver,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub pieces_spawned: u64,
    pub pieces_locked: u64,
    pub lines_cleared: u32,
}

#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    grid: Grid,
    current: Piece,
    queue: VecDeque<Shape>,
    source: PieceSource,
    piece_id: u64,
    pieces_locked: u64,
    over: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut source = PieceSource::new(config.piece_rule, config.seed);
        let first = source.next_shape();
        let mut game = Self {
            grid: Grid::new(config.width, config.height),
            current: Piece::spawn(first),
            queue: VecDeque::with_capacity(config.preview + 1),
            source,
            piece_id: 1,
            pieces_locked: 0,
            over: false,
            config,
        };
        game.current = game.spawn_piece(first);
        game.refill_queue();
        Ok(game)
    }

    /// Replace the locked cells. Dimensions must match the config.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        debug_assert_eq!(
            (grid.width(), grid.height()),
            (self.config.width, self.config.height)
        );
        self.grid = grid;
        self
    }

    /// Force the live piece and the front of the queue. The piece source
    /// takes over once `shapes` runs out.
    pub fn with_queue(mut self, shapes: &[Shape]) -> Self {
        if let Some((&first, rest)) = shapes.split_first() {
            self.current = self.spawn_piece(first);
            self.queue.clear();
            self.queue.extend(rest.iter().copied());
            self.refill_queue();
        }
        self
    }

    fn spawn_piece(&self, shape: Shape) -> Piece {
        Piece::new(shape, (self.config.width / 2) as i32, SPAWN_Y, 0)
    }

    fn refill_queue(&mut self) {
        while self.queue.len() < self.config.preview.max(1) {
            self.queue.push_back(self.source.next_shape());
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> Piece {
        self.current
    }

    /// Increases by one every time a new piece spawns.
    pub fn piece_id(&self) -> u64 {
        self.piece_id
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Up to `n` upcoming pieces, each at its spawn position.
    pub fn upcoming(&self, n: usize) -> Vec<Piece> {
        self.queue
            .iter()
            .take(n)
            .map(|&shape| self.spawn_piece(shape))
            .collect()
    }

    pub fn collides(&self, piece: &Piece) -> bool {
        self.grid.test_collision(piece)
    }

    /// Apply `action` to the live piece. Returns false, changing nothing,
    /// when the result would collide or the game is over.
    pub fn perform_action(&mut self, action: Action) -> bool {
        if self.over {
            return false;
        }
        let moved = action.apply(self.current);
        if self.grid.test_collision(&moved) {
            return false;
        }
        self.current = moved;
        true
    }

    /// Drop the live piece one row, locking it when it cannot fall.
    pub fn tick(&mut self) -> TickOutcome {
        if self.over {
            return TickOutcome::GameOver;
        }
        if self.grid.test_collision(&self.current) {
            return self.top_out();
        }

        let down = self.current.shifted(0, 1);
        if !self.grid.test_collision(&down) {
            self.current = down;
            return TickOutcome::Fell;
        }

        let before = self.grid.cleared_rows();
        if !self.grid.imprint(&self.current) {
            return self.top_out();
        }
        let rows = self.grid.cleared_rows() - before;
        self.pieces_locked += 1;
        debug!(
            piece = %self.current.shape(),
            x = self.current.x(),
            y = self.current.y(),
            rotation = self.current.rotation(),
            rows,
            "piece locked"
        );

        let next = self
            .queue
            .pop_front()
            .unwrap_or_else(|| self.source.next_shape());
        self.current = self.spawn_piece(next);
        self.piece_id += 1;
        self.refill_queue();
        TickOutcome::Locked { rows }
    }

    fn top_out(&mut self) -> TickOutcome {
        self.over = true;
        debug!(
            pieces = self.pieces_locked,
            lines = self.grid.cleared_rows(),
            "topped out"
        );
        TickOutcome::ToppedOut
    }

    pub fn stats(&self) -> GameStats {
        GameStats {
            pieces_spawned: self.piece_id,
            pieces_locked: self.pieces_locked,
            lines_cleared: self.grid.cleared_rows(),
        }
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let live = self.current.cells();
        for y in 0..self.grid.height() {
            write!(f, "|")?;
            for x in 0..self.grid.width() {
                let cell = if live.contains(&(x as i32, y as i32)) {
                    "<>"
                } else if self.grid.get(x, y) {
                    "[]"
                } else {
                    "  "
                };
                write!(f, "{cell}")?;
            }
            writeln!(f, "|")?;
        }
        write!(f, "+{}+", "--".repeat(self.grid.width()))
    }
}
