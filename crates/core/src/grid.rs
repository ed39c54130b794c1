//! occupancy grid - collision tests, imprinting, row clears
//! row 0 is the top visible row, y grows toward the floor

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Piece;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unexpected cell {cell:?} in row {row}")]
    BadCell { row: usize, cell: char },
}

/// Fixed-size boolean grid with a lifetime cleared-row counter.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "GridRows", into = "GridRows")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    cleared_rows: u32,
}

impl Grid {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;

    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
            cleared_rows: 0,
        }
    }

    /// Build from text rows, top first. `#` is occupied, `.` is empty.
    pub fn from_rows<S: AsRef<str>>(width: usize, rows: &[S]) -> Result<Self, GridError> {
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != width {
                return Err(GridError::RowWidth {
                    row: y,
                    expected: width,
                    actual: len,
                });
            }
            for (x, cell) in row.chars().enumerate() {
                match cell {
                    '#' => grid.set(x, y, true),
                    '.' => {}
                    other => return Err(GridError::BadCell { row: y, cell: other }),
                }
            }
        }
        Ok(grid)
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows cleared over the lifetime of this grid.
    #[inline(always)]
    pub fn cleared_rows(&self) -> u32 {
        self.cleared_rows
    }

    #[inline]
    fn index_of(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Panics outside the grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[self.index_of(x, y)]
    }

    /// Panics outside the grid.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        let index = self.index_of(x, y);
        self.cells[index] = occupied;
    }

    /// Total lookup: anything outside the grid reads as empty.
    #[inline]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && self.cells[y as usize * self.width + x as usize]
    }

    /// Does any cell of `piece` hit the floor, a side wall or a locked cell?
    /// Cells above the top only meet the side walls.
    pub fn test_collision(&self, piece: &Piece) -> bool {
        piece.cells().iter().any(|&(x, y)| {
            y >= self.height as i32 || x < 0 || x >= self.width as i32 || self.is_occupied(x, y)
        })
    }

    /// Lock `piece` into the grid and clear full rows.
    ///
    /// Returns false, leaving the grid untouched, when any cell would lock
    /// above the visible top. That is a lost game for this grid.
    pub fn imprint(&mut self, piece: &Piece) -> bool {
        let cells = piece.cells();
        if cells.iter().any(|&(_, y)| y < 0) {
            return false;
        }
        for (x, y) in cells {
            if x >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                self.set(x as usize, y as usize, true);
            }
        }
        self.cleared_rows += self.clear_rows();
        true
    }

    /// Clear every full row in one top-to-bottom pass, shifting the rows
    /// above each one down. Returns how many rows went.
    pub fn clear_rows(&mut self) -> u32 {
        let mut cleared = 0;
        for row in 0..self.height {
            if self.is_row_full(row) {
                cleared += 1;
                let w = self.width;
                self.cells.copy_within(0..row * w, w);
                self.cells[..w].fill(false);
            }
        }
        cleared
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|&c| c)
    }

    pub fn is_row_empty(&self, y: usize) -> bool {
        !self.row(y).iter().any(|&c| c)
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[bool] {
        let start = self.index_of(0, y);
        &self.cells[start..start + self.width]
    }

    /// Topmost occupied row in column `x`, if any.
    pub fn column_top(&self, x: usize) -> Option<usize> {
        (0..self.height).find(|&y| self.get(x, y))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            write!(f, "|")?;
            for x in 0..self.width {
                write!(f, "{}", if self.get(x, y) { "[]" } else { "  " })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Text form used for serialization.
#[derive(Serialize, Deserialize)]
struct GridRows {
    width: usize,
    rows: Vec<String>,
    #[serde(default)]
    cleared_rows: u32,
}

impl From<Grid> for GridRows {
    fn from(grid: Grid) -> Self {
        let rows = (0..grid.height)
            .map(|y| {
                grid.row(y)
                    .iter()
                    .map(|&c| if c { '#' } else { '.' })
                    .collect()
            })
            .collect();
        Self {
            width: grid.width,
            rows,
            cleared_rows: grid.cleared_rows,
        }
    }
}

impl TryFrom<GridRows> for Grid {
    type Error = GridError;

    fn try_from(repr: GridRows) -> Result<Self, Self::Error> {
        let mut grid = Grid::from_rows(repr.width, &repr.rows)?;
        grid.cleared_rows = repr.cleared_rows;
        Ok(grid)
    }
}
