//! Terminal input module (engine-facing).
//!
//! Terminals deliver discrete key-press notifications and no release
//! events, while the engine expects explicit press *and* release pairs.
//! This module maps `crossterm` events into DOOM key codes and synthesizes
//! releases on a quiet-period timer. Mouse movement runs through a parallel
//! state machine that holds a turn key while the mouse keeps moving.

pub mod bridge;
pub mod map;
pub mod mouse;

pub use tui_doom_types as types;

pub use bridge::KeyBridge;
pub use map::{is_confirm_key, key_id, map_key, map_mouse_button, should_quit};
pub use mouse::MouseTurn;
