/// Input state tracker.
///
/// A cursor-and-select puzzle needs edge-triggered keys plus raw
/// character entry for the login prompt, so this tracks fresh presses
/// per frame rather than held state. Call `drain_events()` once per
/// frame before handling input.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

pub struct InputState {
    /// Key presses collected during the most recent drain.
    presses: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { presses: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                // Repeat counts as a press; Release is ignored.
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key);
                }
            }
        }
    }

    /// Was this key pressed this frame?
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.iter().any(|k| k.code == code)
    }

    /// Convenience: was any of these keys pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Characters typed this frame (login prompt entry).
    /// Control-modified characters are excluded.
    pub fn typed_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.presses.iter().filter_map(|k| {
            if k.modifiers.contains(KeyModifiers::CONTROL) {
                return None;
            }
            match k.code {
                KeyCode::Char(c) => Some(c),
                _ => None,
            }
        })
    }

    /// Check if any event this frame was Ctrl+C.
    pub fn ctrl_c_pressed(&self) -> bool {
        self.presses.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
