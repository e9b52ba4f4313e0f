//! Terminal input (host-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides
//! held-key auto-repeat for terminals, including ones that never report key
//! releases. The game core only ever sees discrete actions.

pub mod map;
pub mod repeat;

pub use blockfall_types as types;

pub use map::{map_key, should_quit};
pub use repeat::{Horizontal, KeyRepeat, RepeatActions};
