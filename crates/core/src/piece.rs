//! Positioned, rotated pieces.

use serde::Serialize;

use crate::Shape;

/// Anchor column for freshly spawned pieces.
pub const SPAWN_X: i32 = 5;
/// Anchor row for freshly spawned pieces (above the visible area).
pub const SPAWN_Y: i32 = -2;

/// A shape at a rotation and anchor position. Plain value type.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Piece {
    shape: Shape,
    rotation: u8,
    x: i32,
    y: i32,
}

impl Piece {
    pub fn new(shape: Shape, x: i32, y: i32, rotation: u8) -> Self {
        Self {
            shape,
            rotation: rotation % shape.max_rotations(),
            x,
            y,
        }
    }

    pub fn spawn(shape: Shape) -> Self {
        Self::new(shape, SPAWN_X, SPAWN_Y, 0)
    }

    pub fn i(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::I, x, y, rotation)
    }

    pub fn o(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::O, x, y, rotation)
    }

    pub fn t(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::T, x, y, rotation)
    }

    pub fn s(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::S, x, y, rotation)
    }

    pub fn z(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::Z, x, y, rotation)
    }

    pub fn j(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::J, x, y, rotation)
    }

    pub fn l(x: i32, y: i32, rotation: u8) -> Self {
        Self::new(Shape::L, x, y, rotation)
    }

    #[inline(always)]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline(always)]
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    #[inline(always)]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline(always)]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn max_rotations(&self) -> u8 {
        self.shape.max_rotations()
    }

    /// Same shape and rotation, moved to a new anchor and rotation.
    pub fn placed(&self, x: i32, y: i32, rotation: u8) -> Self {
        Self::new(self.shape, x, y, rotation)
    }

    pub fn rotate_right(&mut self) {
        self.step_rotation(!self.shape.reverses_rotation());
    }

    pub fn rotate_left(&mut self) {
        self.step_rotation(self.shape.reverses_rotation());
    }

    fn step_rotation(&mut self, forward: bool) {
        let max = self.max_rotations();
        self.rotation = if forward {
            (self.rotation + 1) % max
        } else {
            (self.rotation + max - 1) % max
        };
    }

    pub fn shift(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    pub fn rotated_right(mut self) -> Self {
        self.rotate_right();
        self
    }

    pub fn rotated_left(mut self) -> Self {
        self.rotate_left();
        self
    }

    pub fn shifted(mut self, dx: i32, dy: i32) -> Self {
        self.shift(dx, dy);
        self
    }

    /// Absolute (x, y) of the four occupied cells.
    #[inline]
    pub fn cells(&self) -> [(i32, i32); 4] {
        self.shape
            .minos(self.rotation)
            .map(|(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }

    /// Largest y among the occupied cells, i.e. the row closest to the floor.
    pub fn lowest_row(&self) -> i32 {
        self.cells()
            .iter()
            .map(|&(_, y)| y)
            .max()
            .unwrap_or(self.y)
    }

    /// Same cell key (anchor + rotation) as `other`, ignoring shape.
    #[inline]
    pub fn same_key(&self, other: &Piece) -> bool {
        self.x == other.x && self.y == other.y && self.rotation == other.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_is_normalized() {
        assert_eq!(Piece::o(0, 0, 3).rotation(), 0);
        assert_eq!(Piece::i(0, 0, 3).rotation(), 1);
        assert_eq!(Piece::t(0, 0, 6).rotation(), 2);
    }

    #[test]
    fn test_full_turn_is_identity() {
        for shape in Shape::ALL {
            for start in 0..4 {
                let piece = Piece::new(shape, 4, 7, start);
                let mut right = piece;
                let mut left = piece;
                for _ in 0..shape.max_rotations() {
                    right.rotate_right();
                    left.rotate_left();
                }
                assert_eq!(right, piece, "{shape} right from {start}");
                assert_eq!(left, piece, "{shape} left from {start}");
            }
        }
    }

    #[test]
    fn test_left_undoes_right() {
        for shape in Shape::ALL {
            let piece = Piece::new(shape, 3, 3, 1);
            assert_eq!(piece.rotated_right().rotated_left(), piece);
        }
    }

    #[test]
    fn test_reverse_rotation_direction() {
        // J mirrors L, so both advance the index the other way
        assert_eq!(Piece::t(0, 0, 0).rotated_right().rotation(), 1);
        assert_eq!(Piece::l(0, 0, 0).rotated_right().rotation(), 3);
        assert_eq!(Piece::j(0, 0, 0).rotated_left().rotation(), 1);
    }

    #[test]
    fn test_shift_moves_anchor_only() {
        let piece = Piece::s(5, -2, 1).shifted(-2, 3);
        assert_eq!((piece.x(), piece.y(), piece.rotation()), (3, 1, 1));
    }

    #[test]
    fn test_spawn_cells() {
        let piece = Piece::spawn(Shape::O);
        let mut cells = piece.cells();
        cells.sort();
        assert_eq!(cells, [(4, -2), (4, -1), (5, -2), (5, -1)]);
        assert_eq!(piece.lowest_row(), -1);
    }

    #[test]
    fn test_geometry_is_pure() {
        let piece = Piece::z(4, 4, 1);
        let before = piece.cells();
        let _ = piece.rotated_right().cells();
        assert_eq!(piece.cells(), before);
    }
}
