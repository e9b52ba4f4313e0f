//! Terminal render sink.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`core::GameSnapshot`] into a [`FrameBuffer`], and [`TerminalRenderer`]
//! flushes framebuffers to the terminal, writing only what changed.
//!
//! Board cells are drawn two columns wide to compensate for the aspect ratio
//! of terminal glyphs.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_color, AnchorY, GameView, Viewport, WELL_BG};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
