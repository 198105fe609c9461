//! Terminal rendering module.
//!
//! Renders the engine's pixel frame into a styled-cell framebuffer and
//! flushes it to a real terminal. Each terminal cell carries two stacked
//! pixels via the upper-half-block glyph (foreground paints the top half,
//! background the bottom), doubling effective vertical resolution.

pub mod blit;
pub mod fb;
pub mod renderer;

pub use tui_doom_types as types;

pub use blit::{blit, HALF_BLOCK};
pub use fb::{Cell, FrameBuffer};
pub use renderer::TerminalRenderer;
