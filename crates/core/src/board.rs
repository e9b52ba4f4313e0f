//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or tagged with the piece
//! kind that filled it (used for colour only).
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x is the column 0..9 (left to right) and y is the
//! row 0..19 (top to bottom). Rows above the board (y < 0) have no cells.

use arrayvec::ArrayVec;

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices; a board can never have more full rows than it has rows.
pub type RowList = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// Result of stamping a piece into the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Every filled sub-cell landed on the board
    Placed,
    /// At least one filled sub-cell was above the top row
    Overflow,
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty_at(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether `shape` may sit with its top-left corner at (x, y).
    ///
    /// Every filled sub-cell must be inside the column range and above the
    /// floor. Sub-cells above the board (negative row) are always accepted;
    /// sub-cells on the board must land on empty cells.
    pub fn is_legal(&self, shape: &Shape, x: i8, y: i8) -> bool {
        for (dx, dy) in shape.minos() {
            let px = x + dx;
            let py = y + dy;
            if px < 0 || px >= BOARD_WIDTH as i8 || py >= BOARD_HEIGHT as i8 {
                return false;
            }
            if py < 0 {
                continue;
            }
            if self.is_occupied(px, py) {
                return false;
            }
        }
        true
    }

    /// Stamp `kind` into every on-board cell covered by `shape` at (x, y).
    ///
    /// Sub-cells above the board are not written; their presence is reported
    /// as [`LockOutcome::Overflow`].
    pub fn lock(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) -> LockOutcome {
        let mut outcome = LockOutcome::Placed;
        for (dx, dy) in shape.minos() {
            let py = y + dy;
            if py < 0 {
                outcome = LockOutcome::Overflow;
                continue;
            }
            self.set(x + dx, py, Some(kind));
        }
        outcome
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Indices of all full rows, bottom to top
    pub fn full_rows(&self) -> RowList {
        (0..BOARD_HEIGHT as usize)
            .rev()
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Remove `rows` and insert as many empty rows at the top.
    ///
    /// Order and duplicates in `rows` do not matter; out-of-range indices are
    /// ignored. Remaining rows keep their relative order. Uses a two-pointer
    /// pass with `copy_within`, no allocation. Returns the number of rows removed.
    pub fn compact(&mut self, rows: &[usize]) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                let dst_start = write_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, dst_start);
            }
        }

        // write_y rows were removed; blank them at the top.
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        write_y
    }

    /// Number of filled cells on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Get a reference to the internal cells array (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Encode the board as a row-major u8 grid (0 = empty, 1..=7 = kind).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        let width = BOARD_WIDTH as usize;
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * width + x].map_or(0, |k| k.code());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Build a board from text rows, top to bottom.
    ///
    /// `.` is empty, any piece letter fills the cell with that kind, and any
    /// other character fills it with `I`. Missing rows at the top are empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let offset = (BOARD_HEIGHT as usize).saturating_sub(rows.len());
        for (i, row) in rows.iter().enumerate().take(BOARD_HEIGHT as usize) {
            for (x, ch) in row.chars().enumerate().take(BOARD_WIDTH as usize) {
                if ch == '.' {
                    continue;
                }
                let kind = PieceKind::from_str(&ch.to_string()).unwrap_or(PieceKind::I);
                board.set(x as i8, (offset + i) as i8, Some(kind));
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
