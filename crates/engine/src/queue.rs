//! Bounded ring buffer for pending key events.
//!
//! Input arrives at an unbounded rate but the engine consumes one batch per
//! tick, so backpressure must manifest as event loss rather than memory
//! growth. The ring keeps one slot free to distinguish full from empty and
//! silently drops on overflow, matching the queue in the original C shim.

use tui_doom_types::{KeyEvent, KEY_QUEUE_CAPACITY};

pub struct KeyQueue {
    slots: [KeyEvent; KEY_QUEUE_CAPACITY],
    read: usize,
    write: usize,
}

impl KeyQueue {
    pub fn new() -> Self {
        Self {
            slots: [KeyEvent::release(0); KEY_QUEUE_CAPACITY],
            read: 0,
            write: 0,
        }
    }

    /// Enqueue an event; dropped silently when the ring is full.
    pub fn push(&mut self, event: KeyEvent) {
        let next_write = (self.write + 1) % KEY_QUEUE_CAPACITY;
        if next_write == self.read {
            return;
        }
        self.slots[self.write] = event;
        self.write = next_write;
    }

    pub fn pop(&mut self) -> Option<KeyEvent> {
        if self.read == self.write {
            return None;
        }
        let event = self.slots[self.read];
        self.read = (self.read + 1) % KEY_QUEUE_CAPACITY;
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.read == self.write
    }

    pub fn len(&self) -> usize {
        (self.write + KEY_QUEUE_CAPACITY - self.read) % KEY_QUEUE_CAPACITY
    }
}

impl Default for KeyQueue {
    fn default() -> Self {
        Self::new()
    }
}
