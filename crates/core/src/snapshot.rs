//! Read-only view of a game for render sinks.

use crate::pieces::{Piece, Shape};
use crate::types::{Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    /// Row-major board codes, 0 = empty, see `PieceKind::code`
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub phase: Phase,
    pub episode_id: u32,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub best_score: u32,
    /// Rows waiting to be removed while `phase == Clearing`
    pub clearing_rows: [bool; BOARD_HEIGHT as usize],
    /// Elapsed fraction of the clear delay in [0, 1]
    pub clear_progress: f32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_clearing_row(&self, y: usize) -> bool {
        self.phase == Phase::Clearing && self.clearing_rows.get(y).copied().unwrap_or(false)
    }

    /// Opacity for cells in clearing rows this frame.
    pub fn clear_alpha(&self) -> f32 {
        clear_blink_alpha(self.clear_progress)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            phase: Phase::Start,
            episode_id: 0,
            score: 0,
            level: 1,
            lines: 0,
            best_score: 0,
            clearing_rows: [false; BOARD_HEIGHT as usize],
            clear_progress: 0.0,
        }
    }
}

/// Blink curve for clearing rows: one and a half cosine cycles over the
/// delay, opaque at the start and fully faded at the end.
pub fn clear_blink_alpha(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    (p * std::f32::consts::PI * 3.0).cos() * 0.5 + 0.5
}
