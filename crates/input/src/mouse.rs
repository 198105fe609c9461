//! Mouse-to-turn-key state machine.
//!
//! Horizontal movement selects a turn direction; the matching turn key is
//! held down until the mouse stops moving in that direction. A direction
//! switch releases the old key before pressing the new one, so the engine
//! never sees both turn keys down at once.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

use tui_doom_types::keys::{KEY_LEFTARROW, KEY_RIGHTARROW};
use tui_doom_types::{KeyEvent, MOUSE_TURN_QUIET_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    fn code(self) -> u8 {
        match self {
            TurnDirection::Left => KEY_LEFTARROW,
            TurnDirection::Right => KEY_RIGHTARROW,
        }
    }
}

pub struct MouseTurn {
    last_column: Option<u16>,
    held: Option<TurnDirection>,
    quiet_deadline: Option<Instant>,
}

impl MouseTurn {
    pub fn new() -> Self {
        Self {
            last_column: None,
            held: None,
            quiet_deadline: None,
        }
    }

    /// Sample an absolute mouse column.
    ///
    /// The first sample only establishes a reference point.
    pub fn on_move(&mut self, column: u16, now: Instant) -> ArrayVec<KeyEvent, 2> {
        let mut out = ArrayVec::new();

        let Some(last) = self.last_column.replace(column) else {
            return out;
        };
        let direction = if column > last {
            TurnDirection::Right
        } else if column < last {
            TurnDirection::Left
        } else {
            return out;
        };

        if self.held != Some(direction) {
            if let Some(old) = self.held {
                let _ = out.try_push(KeyEvent::release(old.code()));
            }
            let _ = out.try_push(KeyEvent::press(direction.code()));
            self.held = Some(direction);
        }
        self.quiet_deadline = Some(now + Duration::from_millis(MOUSE_TURN_QUIET_MS));

        out
    }

    /// Release the held turn key once the mouse has gone quiet.
    pub fn update(&mut self, now: Instant) -> Option<KeyEvent> {
        let due = matches!(self.quiet_deadline, Some(at) if at <= now);
        if !due {
            return None;
        }
        self.quiet_deadline = None;
        self.held.take().map(|dir| KeyEvent::release(dir.code()))
    }

    /// Release the held key unconditionally (shutdown path).
    pub fn drain(&mut self) -> Option<KeyEvent> {
        self.quiet_deadline = None;
        self.held.take().map(|dir| KeyEvent::release(dir.code()))
    }
}

impl Default for MouseTurn {
    fn default() -> Self {
        Self::new()
    }
}
