//! Settle eval crate - weighted heuristics over a before/after grid pair.
//!
//! Every term is a pure function of the grid before the search, the grid
//! after the locked pieces, and the pieces locked on the way. The evaluator
//! is a cost: lower totals are better placements.

use settle_core::{Grid, Piece};

/// Signature shared by all scoring terms.
pub type ScoreFn = fn(&Grid, &Grid, &[Piece]) -> f64;

/// A named scoring term and its fixed weight.
#[derive(Clone, Copy, Debug)]
pub struct Term {
    pub name: &'static str,
    pub score: ScoreFn,
    pub weight: f64,
}

/// The fixed evaluation table, in application order.
pub const TERMS: [Term; 7] = [
    Term {
        name: "lines_cleared",
        score: lines_cleared,
        weight: -4.0,
    },
    Term {
        name: "lock_height",
        score: lock_height,
        weight: 12.885008263218383,
    },
    Term {
        name: "well_cells",
        score: well_cells,
        weight: 15.842707182438396,
    },
    Term {
        name: "column_holes",
        score: column_holes,
        weight: 26.894496507795950,
    },
    Term {
        name: "column_transitions",
        score: column_transitions,
        weight: 27.616914062397015,
    },
    Term {
        name: "row_transitions",
        score: row_transitions,
        weight: 27.616914062397015,
    },
    Term {
        name: "pile_height",
        score: pile_height,
        weight: 20.0,
    },
];

/// Weighted sum of all terms.
pub fn evaluate(before: &Grid, after: &Grid, locked: &[Piece]) -> f64 {
    TERMS
        .iter()
        .map(|term| (term.score)(before, after, locked) * term.weight)
        .sum()
}

/// Per-term weighted contributions, same order as [`TERMS`].
pub fn breakdown(before: &Grid, after: &Grid, locked: &[Piece]) -> [(&'static str, f64); 7] {
    TERMS.map(|term| (term.name, (term.score)(before, after, locked) * term.weight))
}

/// Reward table over rows cleared since `before`. Negative weight turns the
/// reward into a cost reduction.
pub fn lines_cleared(before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    match after.cleared_rows().saturating_sub(before.cleared_rows()) {
        0 => -1.0,
        1 => 0.5,
        2 => 1.5,
        3 => 4.0,
        _ => 8.0,
    }
}

/// Sum over locked pieces of rows from the floor to the piece's lowest cell,
/// counting the floor row as 1.
pub fn lock_height(_before: &Grid, after: &Grid, locked: &[Piece]) -> f64 {
    let height = after.height() as i32;
    locked
        .iter()
        .map(|piece| (height - piece.lowest_row()) as f64)
        .sum()
}

/// Empty cells sitting on top of a column's stack with solid cells (or a
/// wall) on both sides. At most one per column.
pub fn well_cells(_before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    let width = after.width() as i32;
    let mut wells = 0u32;
    for x in 0..after.width() {
        let Some(top) = after.column_top(x) else {
            continue;
        };
        if top == 0 {
            continue;
        }
        let (cx, cy) = (x as i32, top as i32 - 1);
        let left = cx == 0 || after.is_occupied(cx - 1, cy);
        let right = cx == width - 1 || after.is_occupied(cx + 1, cy);
        if left && right {
            wells += 1;
        }
    }
    wells as f64
}

/// Empty cells directly under a solid cell, top and floor rows excluded.
pub fn column_holes(_before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    let mut holes = 0u32;
    for x in 0..after.width() {
        for y in 1..after.height().saturating_sub(1) {
            if !after.get(x, y) && after.get(x, y - 1) {
                holes += 1;
            }
        }
    }
    holes as f64
}

/// Solid/empty changes down each column, starting under the topmost solid
/// cell. Empty columns have none.
pub fn column_transitions(_before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    let mut transitions = 0u32;
    for x in 0..after.width() {
        let Some(top) = after.column_top(x) else {
            continue;
        };
        for y in top + 1..after.height() {
            if after.get(x, y) != after.get(x, y - 1) {
                transitions += 1;
            }
        }
    }
    transitions as f64
}

/// Solid/empty changes along each non-empty interior row. Outside the walls
/// reads as empty, so every solid run counts both of its ends.
pub fn row_transitions(_before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    let width = after.width() as i32;
    let mut transitions = 0u32;
    for y in 1..after.height().saturating_sub(1) {
        if after.is_row_empty(y) {
            continue;
        }
        let yi = y as i32;
        for x in 0..=width {
            if after.is_occupied(x - 1, yi) != after.is_occupied(x, yi) {
                transitions += 1;
            }
        }
    }
    transitions as f64
}

/// Interior rows holding at least one solid cell.
pub fn pile_height(_before: &Grid, after: &Grid, _locked: &[Piece]) -> f64 {
    (1..after.height().saturating_sub(1))
        .filter(|&y| !after.is_row_empty(y))
        .count() as f64
}
