//! Settle core crate - shapes, pieces and the occupancy grid.

mod action;
mod grid;
mod piece;
mod shape;

pub use action::Action;
pub use grid::{Grid, GridError};
pub use piece::{Piece, SPAWN_X, SPAWN_Y};
pub use shape::{Shape, ShapeDescriptor, ROTATION_SLOTS, TEMPLATE_CENTER, TEMPLATE_SIZE};
