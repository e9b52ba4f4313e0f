//! Pieces module - tetromino shape matrices and the wall-kick rotation system
//!
//! Shapes are square matrices (4x4 for I, 2x2 for O, 3x3 otherwise) rotated
//! geometrically. Kick tables follow the guideline SRS data and are authored
//! Y-up: a positive `dy` moves the piece *up*, i.e. to a smaller board row.
//! Reference: https://tetris.wiki/SRS

use arrayvec::ArrayVec;

use crate::types::{KickFamily, PieceKind, Rotation, BOARD_WIDTH};

/// Offset of a single mino relative to the shape origin (column, row)
pub type MinoOffset = (i8, i8);

/// Largest shape matrix dimension
pub const MAX_SHAPE_SIZE: usize = 4;

/// A square shape matrix of filled/empty sub-cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    size: u8,
    rows: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Build a shape from a 0/1 grid. Only the top-left `size`x`size` part is used.
    pub const fn from_bits(size: u8, bits: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE]) -> Self {
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let n = size as usize;
        let mut r = 0;
        while r < n {
            let mut c = 0;
            while c < n {
                rows[r][c] = bits[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self { size, rows }
    }

    /// Matrix dimension (N of NxN)
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn is_filled(&self, col: usize, row: usize) -> bool {
        col < self.size as usize && row < self.size as usize && self.rows[row][col]
    }

    /// Filled sub-cells as (column, row) offsets, scanned row by row.
    pub fn minos(&self) -> ArrayVec<MinoOffset, 16> {
        let mut out = ArrayVec::new();
        let n = self.size as usize;
        for r in 0..n {
            for c in 0..n {
                if self.rows[r][c] {
                    out.push((c as i8, r as i8));
                }
            }
        }
        out
    }

    /// 90° clockwise rotation of the matrix.
    pub fn rotated_cw(&self) -> Self {
        let n = self.size as usize;
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                rows[c][n - 1 - r] = self.rows[r][c];
            }
        }
        Self { size: self.size, rows }
    }

    /// 90° counter-clockwise rotation of the matrix.
    pub fn rotated_ccw(&self) -> Self {
        let n = self.size as usize;
        let mut rows = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                rows[n - 1 - c][r] = self.rows[r][c];
            }
        }
        Self { size: self.size, rows }
    }
}

const I_SHAPE: Shape = Shape::from_bits(4, [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]);
const O_SHAPE: Shape = Shape::from_bits(2, [[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const T_SHAPE: Shape = Shape::from_bits(3, [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const S_SHAPE: Shape = Shape::from_bits(3, [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const Z_SHAPE: Shape = Shape::from_bits(3, [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const J_SHAPE: Shape = Shape::from_bits(3, [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
const L_SHAPE: Shape = Shape::from_bits(3, [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);

/// Spawn-orientation shape matrix for a piece kind
pub fn base_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => I_SHAPE,
        PieceKind::O => O_SHAPE,
        PieceKind::T => T_SHAPE,
        PieceKind::S => S_SHAPE,
        PieceKind::Z => Z_SHAPE,
        PieceKind::J => J_SHAPE,
        PieceKind::L => L_SHAPE,
    }
}

/// Shape matrix for a piece kind at a given rotation state
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> Shape {
    let mut shape = base_shape(kind);
    if kind == PieceKind::O {
        return shape;
    }
    for _ in 0..rotation.index() {
        shape = shape.rotated_cw();
    }
    shape
}

/// The active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub rotation: Rotation,
    /// Board column of the shape matrix's left edge
    pub x: i8,
    /// Board row of the shape matrix's top edge (may be negative)
    pub y: i8,
}

impl Piece {
    /// Create a new piece at its spawn position: row 0, horizontally centred.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = base_shape(kind);
        Self {
            kind,
            shape,
            rotation: Rotation::North,
            x: ((BOARD_WIDTH - shape.size()) / 2) as i8,
            y: 0,
        }
    }

    /// Same piece moved by (dx, dy) in board coordinates.
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Absolute board coordinates (column, row) of every filled sub-cell.
    pub fn cells(&self) -> ArrayVec<(i8, i8), 16> {
        self.shape
            .minos()
            .iter()
            .map(|&(dx, dy)| (self.x + dx, self.y + dy))
            .collect()
    }
}

/// Wall kick data: 8 transitions x 5 candidate (dx, dy) offsets, Y-up.
pub type KickTable = [[(i8, i8); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
///
/// Row order: 0→1, 1→0, 1→2, 2→1, 2→3, 3→2, 3→0, 0→3.
/// Values are the guideline SRS ones; each row mirrors its reverse transition.
pub const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I piece kick table, same row order as [`JLSTZ_KICKS`].
pub const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// Kick table for a piece kind, `None` for the O piece
pub fn get_kick_table(kind: PieceKind) -> Option<&'static KickTable> {
    match kind.kick_family() {
        KickFamily::I => Some(&I_KICKS),
        KickFamily::Jlstz => Some(&JLSTZ_KICKS),
        KickFamily::None => None,
    }
}

/// Table row for a rotation transition; `None` for non-adjacent states.
pub fn kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    use Rotation::*;
    match (from, to) {
        (North, East) => Some(0),
        (East, North) => Some(1),
        (East, South) => Some(2),
        (South, East) => Some(3),
        (South, West) => Some(4),
        (West, South) => Some(5),
        (West, North) => Some(6),
        (North, West) => Some(7),
        _ => None,
    }
}

/// Try to rotate a piece with wall kicks.
///
/// `is_legal(shape, x, y)` decides whether a shape may occupy an anchor.
/// Returns the rotated piece and the kick offset used (table frame, Y-up),
/// or `None` when the piece cannot rotate at all; the input piece is never
/// modified.
pub fn try_rotate(
    piece: &Piece,
    clockwise: bool,
    is_legal: impl Fn(&Shape, i8, i8) -> bool,
) -> Option<(Piece, (i8, i8))> {
    let table = get_kick_table(piece.kind)?;

    let (new_shape, new_rotation) = if clockwise {
        (piece.shape.rotated_cw(), piece.rotation.rotate_cw())
    } else {
        (piece.shape.rotated_ccw(), piece.rotation.rotate_ccw())
    };
    let kicks = &table[kick_index(piece.rotation, new_rotation)?];

    for &(dx, dy) in kicks.iter() {
        let x = piece.x + dx;
        let y = piece.y - dy;
        if is_legal(&new_shape, x, y) {
            let rotated = Piece {
                shape: new_shape,
                rotation: new_rotation,
                x,
                y,
                ..*piece
            };
            return Some((rotated, (dx, dy)));
        }
    }

    None
}
