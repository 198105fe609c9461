//! Synthetic press/release state machine.
//!
//! One entry per physical key. A press notification marks the key pressed
//! and arms (or re-arms) a single release deadline; there is never more
//! than one outstanding deadline per key. All methods take `now` explicitly
//! so tests control the clock, matching how the tick loop drives this from
//! its own timebase.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent as TermKeyEvent};

use tui_doom_types::{KeyEvent, CONFIRM_TAP_MS, KEY_QUIET_PERIOD_MS};

use crate::map::{is_confirm_key, key_id, map_key};

#[derive(Debug, Clone)]
struct KeyState {
    pressed: bool,
    release_at: Option<Instant>,
    codes: ArrayVec<u8, 3>,
}

/// Bridges discrete terminal key notifications into engine press/release
/// pairs.
pub struct KeyBridge {
    states: HashMap<KeyCode, KeyState>,
}

impl KeyBridge {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Handle one key-press notification.
    ///
    /// Non-confirmation keys emit a press only on the Released -> Pressed
    /// edge; a repeat notification just re-arms the quiet-period deadline.
    /// Confirmation keys emit a press on every notification and release
    /// after a short fixed delay, so modal prompts always see a clean tap.
    pub fn on_key(&mut self, key: &TermKeyEvent, now: Instant) -> ArrayVec<KeyEvent, 4> {
        let mut out = ArrayVec::new();

        let codes = map_key(key);
        if codes.is_empty() {
            return out;
        }
        let Some(id) = key_id(key) else {
            return out;
        };

        let confirm = is_confirm_key(id);
        let state = self.states.entry(id).or_insert_with(|| KeyState {
            pressed: false,
            release_at: None,
            codes: ArrayVec::new(),
        });

        if confirm || !state.pressed {
            for &code in &codes {
                let _ = out.try_push(KeyEvent::press(code));
            }
        }

        let delay = if confirm {
            CONFIRM_TAP_MS
        } else {
            KEY_QUIET_PERIOD_MS
        };
        state.pressed = true;
        state.release_at = Some(now + Duration::from_millis(delay));
        state.codes = codes;

        out
    }

    /// Emit releases for every key whose deadline has passed.
    pub fn update(&mut self, now: Instant) -> ArrayVec<KeyEvent, 16> {
        let mut out = ArrayVec::new();
        for state in self.states.values_mut() {
            let due = matches!(state.release_at, Some(at) if at <= now);
            if !due {
                continue;
            }
            state.release_at = None;
            if state.pressed {
                state.pressed = false;
                for &code in &state.codes {
                    let _ = out.try_push(KeyEvent::release(code));
                }
            }
        }
        out
    }

    /// Release everything still pressed (shutdown path).
    pub fn drain(&mut self) -> ArrayVec<KeyEvent, 32> {
        let mut out = ArrayVec::new();
        for state in self.states.values_mut() {
            state.release_at = None;
            if state.pressed {
                state.pressed = false;
                for &code in &state.codes {
                    let _ = out.try_push(KeyEvent::release(code));
                }
            }
        }
        out
    }

    #[cfg(test)]
    fn is_pressed(&self, id: KeyCode) -> bool {
        self.states.get(&id).map(|s| s.pressed).unwrap_or(false)
    }
}

impl Default for KeyBridge {
    fn default() -> Self {
        Self::new()
    }
}
