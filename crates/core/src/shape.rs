//! The seven shapes and their rotation geometry.
//!
//! Each shape is a 5x5 template plus a couple of rotation quirks. All
//! (shape, rotation) footprints are expanded once into a const table, so
//! geometry lookups never touch mutable state.

use serde::{Deserialize, Serialize};

/// Side length of a shape template.
pub const TEMPLATE_SIZE: usize = 5;

/// Offset from a template cell to the piece anchor.
pub const TEMPLATE_CENTER: i8 = 2;

/// Rotation slots reserved per shape, whatever its `max_rotations`.
pub const ROTATION_SLOTS: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Shape {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Static description of one shape.
#[derive(Debug)]
pub struct ShapeDescriptor {
    /// Occupancy template, `template[row][col]`.
    pub template: [[u8; TEMPLATE_SIZE]; TEMPLATE_SIZE],
    pub max_rotations: u8,
    /// S and Z pivot off-center: odd rotations sit one column further right.
    pub offset_odd_rotations: bool,
    /// Left and right rotation advance the index the other way round.
    pub reverse_rotation: bool,
}

const DESCRIPTORS: [ShapeDescriptor; 7] = [
    // I
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 1, 1, 1, 1],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 2,
        offset_odd_rotations: false,
        reverse_rotation: false,
    },
    // O
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 1,
        offset_odd_rotations: false,
        reverse_rotation: false,
    },
    // T
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 4,
        offset_odd_rotations: false,
        reverse_rotation: false,
    },
    // S
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 1, 1, 0],
            [0, 1, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 2,
        offset_odd_rotations: true,
        reverse_rotation: false,
    },
    // Z
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 0, 1, 1, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 2,
        offset_odd_rotations: true,
        reverse_rotation: false,
    },
    // J
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 1, 0, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 4,
        offset_odd_rotations: false,
        reverse_rotation: true,
    },
    // L
    ShapeDescriptor {
        template: [
            [0, 0, 0, 0, 0],
            [0, 0, 0, 1, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ],
        max_rotations: 4,
        offset_odd_rotations: false,
        reverse_rotation: true,
    },
];

static SHAPES: [ShapeDescriptor; 7] = DESCRIPTORS;

/// Map template cell (col, row) through `step` quarter turns.
const fn transform(col: usize, row: usize, step: usize, offset: bool) -> (usize, usize) {
    match step {
        0 => (col, row),
        1 => {
            if offset {
                (TEMPLATE_SIZE - row, col)
            } else {
                (TEMPLATE_SIZE - 1 - row, col)
            }
        }
        2 => (TEMPLATE_SIZE - 1 - col, TEMPLATE_SIZE - 1 - row),
        _ => (row, TEMPLATE_SIZE - 1 - col),
    }
}

/// `GEOMETRY[shape][rotation_slot]`: the 4 cell offsets from the anchor.
/// Slots past `max_rotations` repeat `slot % max_rotations`.
static GEOMETRY: [[[(i8, i8); 4]; ROTATION_SLOTS]; 7] = {
    let mut table = [[[(0i8, 0i8); 4]; ROTATION_SLOTS]; 7];
    let mut shape = 0;
    while shape < 7 {
        let template = DESCRIPTORS[shape].template;
        let max_rotations = DESCRIPTORS[shape].max_rotations as usize;
        let offset = DESCRIPTORS[shape].offset_odd_rotations;
        let mut slot = 0;
        while slot < ROTATION_SLOTS {
            let step = slot % max_rotations;
            let mut n = 0;
            let mut row = 0;
            while row < TEMPLATE_SIZE {
                let mut col = 0;
                while col < TEMPLATE_SIZE {
                    if template[row][col] != 0 {
                        let (c, r) = transform(col, row, step, offset);
                        table[shape][slot][n] =
                            (c as i8 - TEMPLATE_CENTER, r as i8 - TEMPLATE_CENTER);
                        n += 1;
                    }
                    col += 1;
                }
                row += 1;
            }
            slot += 1;
        }
        shape += 1;
    }
    table
};

impl Shape {
    pub const ALL: [Shape; 7] = [
        Shape::I,
        Shape::O,
        Shape::T,
        Shape::S,
        Shape::Z,
        Shape::J,
        Shape::L,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static ShapeDescriptor {
        &SHAPES[self.index()]
    }

    #[inline]
    pub fn max_rotations(self) -> u8 {
        SHAPES[self.index()].max_rotations
    }

    #[inline]
    pub fn reverses_rotation(self) -> bool {
        SHAPES[self.index()].reverse_rotation
    }

    /// Cell offsets (dx, dy) from the anchor, y pointing down.
    #[inline]
    pub fn minos(self, rotation: u8) -> [(i8, i8); 4] {
        GEOMETRY[self.index()][rotation as usize % ROTATION_SLOTS]
    }

    pub fn letter(self) -> char {
        match self {
            Shape::I => 'I',
            Shape::O => 'O',
            Shape::T => 'T',
            Shape::S => 'S',
            Shape::Z => 'Z',
            Shape::J => 'J',
            Shape::L => 'L',
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
