//! Dense arena of placement states, one layer per lookahead ply.

use std::ops::{Index, IndexMut};

use settle_core::{Grid, Piece, ROTATION_SLOTS, SPAWN_Y, TEMPLATE_CENTER};

/// Handle into a [`StateSpace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A candidate position for one queue piece during the BFS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementState {
    pub piece: Piece,
    pub visited: bool,
    pub predecessor: Option<StateId>,
}

/// Every (x, y, rotation slot, depth) a search can touch, pre-populated with
/// the queue piece of that depth.
#[derive(Clone, Debug)]
pub struct StateSpace {
    x_min: i32,
    y_min: i32,
    columns: usize,
    rows: usize,
    depths: usize,
    states: Vec<PlacementState>,
}

impl StateSpace {
    pub fn build(grid: &Grid, queue: &[Piece]) -> Self {
        let margin = TEMPLATE_CENTER as i32;
        let x_min = -margin;
        let x_max = grid.width() as i32 + margin;
        let y_min = queue
            .iter()
            .map(Piece::y)
            .min()
            .map_or(SPAWN_Y, |y| y.min(SPAWN_Y));
        let y_max = grid.height() as i32 + margin;

        let columns = (x_max - x_min) as usize;
        let rows = (y_max - y_min) as usize;
        let layer = columns * rows * ROTATION_SLOTS;

        let mut states = Vec::with_capacity(layer * queue.len());
        for seed in queue {
            for rotation in 0..ROTATION_SLOTS as u8 {
                for y in y_min..y_max {
                    for x in x_min..x_max {
                        states.push(PlacementState {
                            piece: seed.placed(x, y, rotation),
                            visited: false,
                            predecessor: None,
                        });
                    }
                }
            }
        }

        Self {
            x_min,
            y_min,
            columns,
            rows,
            depths: queue.len(),
            states,
        }
    }

    #[inline]
    fn layer_len(&self) -> usize {
        self.columns * self.rows * ROTATION_SLOTS
    }

    /// Handle for a position, or `None` outside the arena.
    pub fn id(&self, x: i32, y: i32, rotation: u8, depth: usize) -> Option<StateId> {
        let col = x - self.x_min;
        let row = y - self.y_min;
        if col < 0 || row < 0 || depth >= self.depths || rotation as usize >= ROTATION_SLOTS {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.columns || row >= self.rows {
            return None;
        }
        let slot = depth * ROTATION_SLOTS + rotation as usize;
        Some(StateId((slot * self.rows + row) * self.columns + col))
    }

    /// Handle of the state holding `piece`'s position at `depth`.
    #[inline]
    pub fn id_of(&self, piece: &Piece, depth: usize) -> Option<StateId> {
        self.id(piece.x(), piece.y(), piece.rotation(), depth)
    }

    /// Forget visits and predecessors in one ply layer.
    pub fn reset_depth(&mut self, depth: usize) {
        if depth >= self.depths {
            return;
        }
        let len = self.layer_len();
        for state in &mut self.states[depth * len..(depth + 1) * len] {
            state.visited = false;
            state.predecessor = None;
        }
    }

    /// Total number of states across all layers.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl Index<StateId> for StateSpace {
    type Output = PlacementState;

    fn index(&self, id: StateId) -> &PlacementState {
        &self.states[id.0]
    }
}

impl IndexMut<StateId> for StateSpace {
    fn index_mut(&mut self, id: StateId) -> &mut PlacementState {
        &mut self.states[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settle_core::Shape;

    #[test]
    fn test_states_hold_their_position() {
        let grid = Grid::default();
        let queue = [Piece::spawn(Shape::T), Piece::spawn(Shape::I)];
        let space = StateSpace::build(&grid, &queue);
        assert_eq!(space.len(), 14 * 24 * 4 * 2);

        let id = space.id(3, 7, 2, 0).expect("inside arena");
        let piece = space[id].piece;
        assert_eq!((piece.shape(), piece.x(), piece.y(), piece.rotation()), (Shape::T, 3, 7, 2));
        assert!(!space[id].visited);
        assert_eq!(space[id].predecessor, None);

        let id = space.id(0, 0, 1, 1).expect("inside arena");
        assert_eq!(space[id].piece.shape(), Shape::I);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::default();
        let space = StateSpace::build(&grid, &[Piece::spawn(Shape::O)]);
        assert!(space.id(-2, -2, 0, 0).is_some());
        assert!(space.id(11, 21, 3, 0).is_some());
        assert!(space.id(-3, 0, 0, 0).is_none());
        assert!(space.id(12, 0, 0, 0).is_none());
        assert!(space.id(0, -3, 0, 0).is_none());
        assert!(space.id(0, 22, 0, 0).is_none());
        assert!(space.id(0, 0, 4, 0).is_none());
        assert!(space.id(0, 0, 0, 1).is_none());
    }

    #[test]
    fn test_high_seed_extends_rows() {
        let grid = Grid::default();
        let space = StateSpace::build(&grid, &[Piece::t(5, -4, 0)]);
        assert!(space.id(5, -4, 0, 0).is_some());
        assert!(space.id(5, -5, 0, 0).is_none());
    }

    #[test]
    fn test_ids_are_distinct() {
        let grid = Grid::new(8, 4);
        let space = StateSpace::build(&grid, &[Piece::spawn(Shape::T); 2]);
        let mut seen = vec![false; space.len()];
        for depth in 0..2 {
            for rotation in 0..4 {
                for y in -2..6 {
                    for x in -2..10 {
                        let id = space.id(x, y, rotation, depth).expect("inside arena");
                        assert!(!seen[id.index()]);
                        seen[id.index()] = true;
                    }
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_reset_depth_touches_one_layer() {
        let grid = Grid::default();
        let mut space = StateSpace::build(&grid, &[Piece::spawn(Shape::S); 2]);
        let a = space.id(4, 4, 0, 0).expect("inside arena");
        let b = space.id(4, 5, 0, 1).expect("inside arena");
        space[a].visited = true;
        space[b].visited = true;
        space[b].predecessor = Some(a);

        space.reset_depth(1);
        assert!(space[a].visited);
        assert!(!space[b].visited);
        assert_eq!(space[b].predecessor, None);
    }
}
