//! Placement search: reachability BFS per piece, recursion over the queue.

use std::collections::VecDeque;

use settle_core::{Grid, Piece};
use settle_eval::{breakdown, evaluate};
use tracing::{debug, enabled, trace, Level};

use crate::recording::Recording;
use crate::state_space::{StateId, StateSpace};
use crate::SearchError;

/// Best line found from one ply down to the end of the queue.
#[derive(Clone, Debug)]
struct Branch {
    state: StateId,
    score: f64,
    /// Grid right after this ply's piece locked.
    placed: Grid,
    /// Grid after the last queue piece locked, as evaluated.
    terminal: Grid,
    /// Pieces locked from the first ply down to `terminal`.
    line: Vec<Piece>,
}

/// Result of a search. Owns the arena so the winning path can be replayed.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Where the live piece starts.
    pub start: StateId,
    /// Settle state the live piece should reach.
    pub goal: StateId,
    pub placement: Piece,
    pub score: f64,
    /// Grid the winning score was computed on.
    pub terminal: Grid,
    /// Grid after only the live piece locks.
    pub first_ply: Grid,
    /// Every piece of the winning line, live piece first.
    pub line: Vec<Piece>,
    pub states_visited: usize,
    space: StateSpace,
}

impl SearchOutcome {
    /// Inputs that take the live piece from `start` to `goal`.
    pub fn recording(&self) -> Recording {
        Recording::reconstruct(&self.space, self.goal, self.start)
    }
}

pub struct PlacementSearch<'a> {
    root: &'a Grid,
    queue: &'a [Piece],
    space: StateSpace,
    states_visited: usize,
}

impl<'a> PlacementSearch<'a> {
    /// Pick the placement of `queue[0]` whose best continuation through the
    /// rest of the queue scores lowest.
    pub fn run(grid: &'a Grid, queue: &'a [Piece]) -> Result<SearchOutcome, SearchError> {
        let Some(live) = queue.first() else {
            return Err(SearchError::EmptyQueue);
        };
        if grid.test_collision(live) {
            return Err(SearchError::SeedCollides);
        }

        let space = StateSpace::build(grid, queue);
        for (index, seed) in queue.iter().enumerate() {
            if space.id_of(seed, index).is_none() {
                return Err(SearchError::SeedOutOfBounds {
                    index,
                    x: seed.x(),
                    y: seed.y(),
                });
            }
        }
        let start = space
            .id_of(live, 0)
            .ok_or(SearchError::SeedOutOfBounds {
                index: 0,
                x: live.x(),
                y: live.y(),
            })?;

        let mut search = PlacementSearch {
            root: grid,
            queue,
            space,
            states_visited: 0,
        };
        let mut locked = Vec::with_capacity(queue.len());
        let best = search
            .best_branch(0, grid, &mut locked)
            .ok_or(SearchError::NoPlacement)?;

        let placement = search.space[best.state].piece;
        debug!(
            piece = %placement.shape(),
            x = placement.x(),
            y = placement.y(),
            rotation = placement.rotation(),
            score = best.score,
            states = search.states_visited,
            "placement chosen"
        );
        if enabled!(Level::DEBUG) {
            for (name, value) in breakdown(grid, &best.terminal, &best.line) {
                debug!(term = name, value, "score term");
            }
        }

        Ok(SearchOutcome {
            start,
            goal: best.state,
            placement,
            score: best.score,
            terminal: best.terminal,
            first_ply: best.placed,
            line: best.line,
            states_visited: search.states_visited,
            space: search.space,
        })
    }

    /// Every settle state reachable by `queue[depth]` on `grid`, in
    /// discovery order. Leaves predecessors set in layer `depth`.
    fn settle_states(&mut self, depth: usize, grid: &Grid) -> Vec<StateId> {
        let mut settled = Vec::new();
        let seed_piece = self.queue[depth];
        if grid.test_collision(&seed_piece) {
            return settled;
        }
        let Some(seed) = self.space.id_of(&seed_piece, depth) else {
            return settled;
        };

        self.space[seed].visited = true;
        let mut frontier = VecDeque::from([seed]);

        while let Some(id) = frontier.pop_front() {
            self.states_visited += 1;
            let piece = self.space[id].piece;

            let rotated = (piece.max_rotations() > 1).then(|| piece.rotated_right());
            let down = piece.shifted(0, 1);
            let candidates = [
                rotated,
                Some(piece.shifted(-1, 0)),
                Some(piece.shifted(1, 0)),
                Some(down),
            ];

            if grid.test_collision(&down) {
                settled.push(id);
            }

            for candidate in candidates.into_iter().flatten() {
                if candidate.same_key(&piece) || grid.test_collision(&candidate) {
                    continue;
                }
                let Some(next) = self.space.id_of(&candidate, depth) else {
                    continue;
                };
                let state = &mut self.space[next];
                if state.visited {
                    continue;
                }
                state.visited = true;
                state.predecessor = Some(id);
                frontier.push_back(next);
            }
        }

        settled
    }

    /// Lowest-scoring line for plies `depth..`, or `None` when every
    /// placement at this ply tops out or has no continuation.
    fn best_branch(&mut self, depth: usize, grid: &Grid, locked: &mut Vec<Piece>) -> Option<Branch> {
        let settled = self.settle_states(depth, grid);
        trace!(depth, settled = settled.len(), "ply expanded");

        let mut best: Option<Branch> = None;
        for state in settled {
            let piece = self.space[state].piece;
            let mut next = grid.clone();
            if !next.imprint(&piece) {
                continue;
            }
            locked.push(piece);

            let candidate = if depth + 1 == self.queue.len() {
                let score = evaluate(self.root, &next, locked);
                is_better(score, &best).then(|| Branch {
                    state,
                    score,
                    terminal: next.clone(),
                    placed: next,
                    line: locked.clone(),
                })
            } else {
                self.space.reset_depth(depth + 1);
                self.best_branch(depth + 1, &next, locked)
                    .filter(|child| is_better(child.score, &best))
                    .map(|child| Branch {
                        state,
                        placed: next,
                        ..child
                    })
            };

            locked.pop();
            if candidate.is_some() {
                best = candidate;
            }
        }

        best
    }
}

/// Strictly lower wins, so ties keep the earlier branch.
#[inline]
fn is_better(score: f64, best: &Option<Branch>) -> bool {
    best.as_ref().map_or(true, |b| score < b.score)
}
