//! Discrete player inputs.

use serde::{Deserialize, Serialize};

use crate::Piece;

/// One input applied to the live piece. Row drops are not actions; the game
/// tick does those.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Rotate right.
    Rotate,
    Left,
    Right,
}

impl Action {
    /// Where `piece` would end up, ignoring collisions.
    pub fn apply(self, piece: Piece) -> Piece {
        match self {
            Action::Rotate => piece.rotated_right(),
            Action::Left => piece.shifted(-1, 0),
            Action::Right => piece.shifted(1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let p = Piece::t(4, 2, 0);
        assert_eq!(Action::Left.apply(p).x(), 3);
        assert_eq!(Action::Right.apply(p).x(), 5);
        assert_eq!(Action::Rotate.apply(p).rotation(), 1);
        assert_eq!(Action::Rotate.apply(p).y(), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Action::Rotate).expect("serialize");
        assert_eq!(json, "\"Rotate\"");
    }
}
