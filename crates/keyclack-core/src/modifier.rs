// Keyclack Modifier Tracking
// Held-modifier state and the exit chord built on it

use crate::input::{KeyAction, RawEvent};
use crate::Key;

/// Modifier keys plus an exit key that together stop keyclack.
///
/// Any one of the modifier variants counts; left and right Control by default,
/// with C as the exit key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitChord {
    modifiers: Vec<Key>,
    exit_key: Key,
}

impl ExitChord {
    pub fn new(modifiers: Vec<Key>, exit_key: Key) -> Self {
        Self {
            modifiers,
            exit_key,
        }
    }

    pub fn is_modifier(&self, code: u16) -> bool {
        self.modifiers.iter().any(|k| k.code() == code)
    }

    pub fn is_exit_key(&self, code: u16) -> bool {
        self.exit_key.code() == code
    }

    pub fn modifiers(&self) -> &[Key] {
        &self.modifiers
    }

    pub fn exit_key(&self) -> Key {
        self.exit_key
    }
}

impl Default for ExitChord {
    fn default() -> Self {
        Self::new(vec![Key::LEFT_CTRL, Key::RIGHT_CTRL], Key::C)
    }
}

/// Whether a chord modifier is currently held.
///
/// Mirrors the last value seen for any modifier variant, so releasing either
/// variant clears the flag even if the other is still down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    held: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self { held: false }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Feed a key event.
    ///
    /// Returns `true` when the event completes the exit chord.
    pub fn update(&mut self, chord: &ExitChord, event: &RawEvent) -> bool {
        if !event.is_key_event() {
            return false;
        }
        if chord.is_modifier(event.code) {
            self.held = event.value != 0;
        }
        self.held && chord.is_exit_key(event.code) && event.action() == Some(KeyAction::Press)
    }
}
