//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the game: the board, the seven pieces, the
//! wall-kick rotation system, gravity, locking, line clears, scoring and
//! level progression. It does no I/O and has no dependency on the
//! terminal, so the same session can be driven by a real clock in the
//! binary or by synthetic time in tests.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 well with collision checks, locking and row compaction
//! - [`pieces`]: piece shapes, matrix rotation and the kick tables
//! - [`game_state`]: the session state machine (start, playing, clearing, over)
//! - [`scoring`]: line-clear and drop points, level and gravity curve
//! - [`rng`]: seeded piece randomizer (uniform or 7-bag)
//! - [`timers`]: gravity accumulator and line-clear countdown
//! - [`config`]: tunable game parameters, loadable from JSON
//! - [`events`]: notifications drained by the host
//! - [`snapshot`]: plain-data view for renderers
//!
//! # Game Rules
//!
//! - Pieces spawn horizontally centred on row 0 and fall one row per gravity
//!   period, `max(50, 1000 - (level - 1) * 80)` ms.
//! - A piece that cannot fall locks immediately; there is no lock delay.
//! - Full rows blink for 300 ms before they are removed. Nothing else moves
//!   during that time.
//! - Clearing 1/2/3/4 lines scores 100/300/500/800 times the level in effect
//!   when the clear completes. Soft drop scores 1 point, hard drop 2 per row.
//! - The level is `lines / 10 + 1`.
//! - The game ends when a new piece cannot spawn or a piece locks with cells
//!   above the top row.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState};
//! use blockfall_core::types::{GameAction, Phase};
//!
//! let mut game = GameState::new(GameConfig::default().with_seed(12345));
//! game.apply_action(GameAction::Start);
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards two points per row descended
//! assert!(game.score() > 0);
//! ```
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with
//! the elapsed milliseconds.

pub mod board;
pub mod config;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timers;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, LockOutcome};
pub use config::GameConfig;
pub use events::GameEvent;
pub use game_state::GameState;
pub use pieces::{get_shape, try_rotate, Piece, Shape};
pub use rng::{PieceQueue, Randomizer, SimpleRng};
pub use scoring::{drop_score, gravity_interval_ms, level_for_lines, line_clear_score, GravityCurve};
pub use snapshot::{clear_blink_alpha, ActiveSnapshot, GameSnapshot};
pub use timers::Timers;
