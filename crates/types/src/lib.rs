//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, persistence).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn**: row 0, horizontally centred on the piece's shape matrix
//!
//! # Timing Defaults
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Host frame interval (~60 FPS) |
//! | `BASE_GRAVITY_MS` | 1000 | Gravity period at level 1 |
//! | `GRAVITY_STEP_MS` | 80 | Period reduction per level |
//! | `GRAVITY_FLOOR_MS` | 50 | Fastest gravity period |
//! | `LINE_CLEAR_DELAY_MS` | 300 | Blink delay before cleared rows are removed |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Host frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Gravity period at level 1 (1000ms = 1 second per row)
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity period reduction per level gained
pub const GRAVITY_STEP_MS: u32 = 80;

/// Gravity period never drops below this
pub const GRAVITY_FLOOR_MS: u32 = 50;

/// Duration of the line-clear blink before rows are removed
pub const LINE_CLEAR_DELAY_MS: u32 = 300;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Held-key auto-repeat delay (DAS)
pub const DEFAULT_REPEAT_DELAY_MS: u32 = 150;

/// Held-key auto-repeat interval (ARR)
pub const DEFAULT_REPEAT_RATE_MS: u32 = 50;

/// Soft drop repeats start immediately
pub const SOFT_DROP_REPEAT_DELAY_MS: u32 = 0;

/// Soft drop repeat interval
pub const SOFT_DROP_REPEAT_RATE_MS: u32 = 50;

/// Line clear points at level 1, indexed by lines cleared.
///
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row for a soft drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row descended during a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Wall-kick table family a piece kind rotates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickFamily {
    /// The I piece has its own kick table.
    I,
    /// J, L, S, T and Z share one kick table.
    Jlstz,
    /// The O piece never rotates.
    None,
}

impl PieceKind {
    /// All kinds in a fixed order (also the order of the 7-bag before shuffling).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter used in panels and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    pub fn kick_family(&self) -> KickFamily {
        match self {
            PieceKind::I => KickFamily::I,
            PieceKind::O => KickFamily::None,
            PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => {
                KickFamily::Jlstz
            }
        }
    }

    /// Compact board encoding: 0 is empty, kinds are 1..=7.
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state index (0 = North .. 3 = West)
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Game actions delivered by the input source
///
/// Each action maps to a specific game mechanic. Which actions are honored
/// depends on the current [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Instantly drop piece to lowest legal position and lock it.
    /// Also begins or restarts the game outside of play.
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Begin a game from the start screen or after game over
    Start,
    /// Abandon the current game and begin a new one
    Restart,
}

impl GameAction {
    /// Parse action from a camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "start" => Some(GameAction::Start),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Start => "start",
            GameAction::Restart => "restart",
        }
    }
}

/// Game lifecycle phase
///
/// `Start` → `Playing` ⇄ `Clearing`, and `Playing`/`Clearing` → `Over`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Title screen, no board committed to gameplay yet
    #[default]
    Start,
    /// Active piece falling under gravity
    Playing,
    /// Full rows blinking before they are removed
    Clearing,
    /// Terminal state until restart
    Over,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Playing => "playing",
            Phase::Clearing => "clearing",
            Phase::Over => "over",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by the specified piece kind (colour only)
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_code_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn kick_families() {
        assert_eq!(PieceKind::I.kick_family(), KickFamily::I);
        assert_eq!(PieceKind::O.kick_family(), KickFamily::None);
        for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::T, PieceKind::Z] {
            assert_eq!(kind.kick_family(), KickFamily::Jlstz);
        }
    }

    #[test]
    fn rotation_cycles() {
        let mut r = Rotation::North;
        for expected in 1..=4u8 {
            r = r.rotate_cw();
            assert_eq!(r.index(), expected % 4);
        }
        assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    }

    #[test]
    fn action_names_roundtrip() {
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::RotateCcw,
            GameAction::Start,
            GameAction::Restart,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
