//! Core types module - shared constants and pure data types
//!
//! Everything here is plain data with no external dependencies, so it can be
//! used from the engine host, the input bridge, the blitter, and tests alike.
//!
//! # Framebuffer dimensions
//!
//! The embedded doomgeneric build renders at a fixed resolution:
//!
//! - **Width**: 1280 pixels
//! - **Height**: 800 pixels
//!
//! The terminal grid is variable; the blitter resamples every frame.
//!
//! # Timing constants
//!
//! All values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 28 | Fixed timestep interval (~35 Hz, DOOM's native rate) |
//! | `KEY_QUIET_PERIOD_MS` | 300 | Synthetic key release after the last press |
//! | `CONFIRM_TAP_MS` | 50 | Press-to-release delay for confirmation keys |
//! | `MOUSE_TURN_QUIET_MS` | 100 | Turn key release after the mouse stops |
//! | `SAVE_SYNC_INTERVAL_MS` | 5000 | Periodic save reconciliation |

pub mod frame;
pub mod keys;

pub use frame::{Rgb, RgbaFrame};

/// Fixed framebuffer dimensions of the embedded engine.
pub const DOOM_RES_X: usize = 1280;
pub const DOOM_RES_Y: usize = 800;

/// Ring slots in the host-side key event queue. One slot is kept free to
/// distinguish full from empty, so at most 255 events are pending.
pub const KEY_QUEUE_CAPACITY: usize = 256;

/// Game timing constants (in milliseconds)
pub const TICK_MS: u64 = 28;
pub const KEY_QUIET_PERIOD_MS: u64 = 300;
pub const CONFIRM_TAP_MS: u64 = 50;
pub const MOUSE_TURN_QUIET_MS: u64 = 100;
pub const SAVE_SYNC_INTERVAL_MS: u64 = 5000;

/// Save slots are numbered 0..=5; each maps to one `doomsav{n}.dsg` file.
pub const MAX_SAVE_SLOTS: u8 = 6;

/// File name the engine uses for a save slot, on disk and in its private
/// filesystem alike.
pub fn save_slot_file_name(slot: u8) -> String {
    format!("doomsav{slot}.dsg")
}

/// A key event crossing the host/engine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub pressed: bool,
    pub code: u8,
}

impl KeyEvent {
    pub const fn press(code: u8) -> Self {
        Self {
            pressed: true,
            code,
        }
    }

    pub const fn release(code: u8) -> Self {
        Self {
            pressed: false,
            code,
        }
    }
}
