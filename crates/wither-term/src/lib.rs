// SPDX-License-Identifier: MIT
//
// wither-term: the character framebuffer for wither.
//
// A grid of cells held as three parallel planes (glyph, color, active
// mask), drawn to by point and plane-wide operations, and flushed to the
// terminal as one escape-coded frame. The same planes serialize to a
// compact stored-frame format.
//
// Like the rest of the workspace, this crate talks to the terminal
// directly: a few ANSI sequences for output and termios for input, with
// no TUI framework in between.

pub mod ansi;
pub mod area;
pub mod buffer;
pub mod color;
pub mod mask;
pub mod output;
pub mod stored;
pub mod terminal;

pub use area::{Area, AreaError, Position};
pub use buffer::{FrameBuffer, Planes};
pub use color::Color;
pub use stored::LoadError;
