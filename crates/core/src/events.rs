//! Events emitted by the game for the host (logging, persistence).
//!
//! The game buffers events; the host drains them once per frame with
//! [`GameState::drain_events`](crate::GameState::drain_events).

use crate::types::PieceKind;

/// Maximum number of undrained events kept; newer ones are dropped.
pub const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new game began
    Started { episode: u32 },
    /// The active piece was stamped into the board
    Locked { kind: PieceKind },
    /// Cleared rows were removed after the blink delay
    LinesCleared { count: u32, points: u32 },
    /// Cumulative lines reached a new level
    LevelUp { level: u32 },
    /// The session score passed the stored best score
    NewBest { score: u32 },
    /// The session ended
    GameOver { score: u32 },
}
