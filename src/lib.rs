//! TUI DOOM (workspace facade crate).
//!
//! This package keeps a single `tui_doom::{engine,input,saves,term,audio,types}`
//! public API while the implementation lives in dedicated crates under
//! `crates/`. The binary-side helpers (CLI parsing, debug logging) live
//! here too so they can be unit tested.

pub mod cli;
pub mod dlog;

pub use tui_doom_audio as audio;
pub use tui_doom_engine as engine;
pub use tui_doom_input as input;
pub use tui_doom_saves as saves;
pub use tui_doom_term as term;
pub use tui_doom_types as types;
