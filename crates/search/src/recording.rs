//! Turns a path through the state space into inputs for the live game.

use std::collections::VecDeque;

use settle_core::{Action, Piece};

use crate::state_space::{StateId, StateSpace};

/// What the player should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    /// Apply one input to the live piece.
    Act(Action),
    /// The piece is lined up; let it fall one row.
    Drop,
    /// Nothing recorded. Let gravity run.
    Idle,
}

/// Inputs grouped by row: each group is played, then the piece drops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recording {
    groups: VecDeque<VecDeque<Action>>,
}

impl Recording {
    /// Walk predecessors from `goal` back to `start` and record the inputs
    /// that retrace the path forward.
    pub fn reconstruct(space: &StateSpace, goal: StateId, start: StateId) -> Self {
        let mut path = vec![space[goal].piece];
        let mut cursor = goal;
        while cursor != start {
            let Some(prev) = space[cursor].predecessor else {
                break;
            };
            path.push(space[prev].piece);
            cursor = prev;
        }
        path.reverse();

        let mut groups = VecDeque::new();
        let mut group = VecDeque::new();
        for pair in path.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            group.extend(std::iter::repeat(Action::Rotate).take(rotations_between(&from, &to)));

            let dx = to.x() - from.x();
            let step = if dx < 0 { Action::Left } else { Action::Right };
            group.extend(std::iter::repeat(step).take(dx.unsigned_abs() as usize));

            if to.y() != from.y() {
                groups.push_back(std::mem::take(&mut group));
            }
        }
        if !group.is_empty() {
            groups.push_back(group);
        }

        Self { groups }
    }

    /// Next input, consuming it.
    pub fn next_step(&mut self) -> Playback {
        let Some(front) = self.groups.front_mut() else {
            return Playback::Idle;
        };
        match front.pop_front() {
            Some(action) => Playback::Act(action),
            None => {
                self.groups.pop_front();
                Playback::Drop
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Row drops still to come, counting a trailing group.
    pub fn drops(&self) -> usize {
        self.groups.len()
    }

    /// Inputs still to play.
    pub fn actions(&self) -> usize {
        self.groups.iter().map(VecDeque::len).sum()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Right rotations that take `from` to `to`, found by turning `to` left
/// until it lines up with `from`.
fn rotations_between(from: &Piece, to: &Piece) -> usize {
    let mut turned = *to;
    let mut count = 0;
    while turned.rotation() != from.rotation() && count < from.max_rotations() as usize {
        turned.rotate_left();
        count += 1;
    }
    count
}
