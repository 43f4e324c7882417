// Keyclack Sound Map
// Key code to sample filename table

use std::collections::HashMap;

use crate::Key;

/// Exclusive upper bound on key codes that may carry a sound.
pub const MAX_KEY_CODE: u16 = 256;

/// Mapping from key code to the sound sample played on press.
///
/// Partial and many-to-one: several keys may share a sample and most codes
/// have none. Codes at or above [`MAX_KEY_CODE`] are never mapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundMap {
    sounds: HashMap<Key, String>,
}

impl SoundMap {
    /// Create an empty sound map
    pub fn new() -> Self {
        Self {
            sounds: HashMap::new(),
        }
    }

    /// Built-in table shipped with the default sample pack.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for (key, file) in DEFAULT_SOUNDS {
            map.insert(*key, *file);
        }
        map
    }

    /// Assign a sample to a key.
    ///
    /// Returns `false` and leaves the map untouched when the key code is out
    /// of range.
    pub fn insert(&mut self, key: Key, file: impl Into<String>) -> bool {
        if key.code() >= MAX_KEY_CODE {
            return false;
        }
        self.sounds.insert(key, file.into());
        true
    }

    /// Remove any sample assigned to a key
    pub fn remove(&mut self, key: Key) -> Option<String> {
        self.sounds.remove(&key)
    }

    /// Sample for a raw key code, if one is mapped.
    pub fn lookup(&self, code: u16) -> Option<&str> {
        if code >= MAX_KEY_CODE {
            return None;
        }
        self.sounds.get(&Key(code)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Distinct sample filenames, sorted. Used to check the asset directory.
    pub fn files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = self.sounds.values().map(String::as_str).collect();
        files.sort_unstable();
        files.dedup();
        files
    }
}

const DEFAULT_SOUNDS: &[(Key, &str)] = &[
    // Number row
    (Key::KEY_1, "q.wav"),
    (Key::KEY_2, "w.wav"),
    (Key::KEY_3, "e.wav"),
    (Key::KEY_4, "e.wav"),
    (Key::KEY_5, "r.wav"),
    (Key::KEY_6, "t.wav"),
    (Key::KEY_7, "y.wav"),
    (Key::KEY_8, "u.wav"),
    (Key::KEY_9, "i.wav"),
    (Key::KEY_0, "o.wav"),
    (Key::MINUS, "p.wav"),
    (Key::EQUAL, "[.wav"),
    (Key::GRAVE, "q.wav"),
    // Modifiers
    (Key::LEFT_CTRL, "backspace.wav"),
    (Key::RIGHT_CTRL, "backspace.wav"),
    (Key::LEFT_ALT, "e.wav"),
    (Key::RIGHT_ALT, "p.wav"),
    (Key::LEFT_SHIFT, "shift.wav"),
    (Key::RIGHT_SHIFT, "shift.wav"),
    (Key::CAPSLOCK, "caps lock.wav"),
    // Punctuation
    (Key::SEMICOLON, "[.wav"),
    (Key::APOSTROPHE, "].wav"),
    (Key::COMMA, "m.wav"),
    (Key::DOT, "[.wav"),
    (Key::SLASH, "].wav"),
    (Key::LEFT_BRACE, "[.wav"),
    (Key::RIGHT_BRACE, "].wav"),
    // Editing
    (Key::BACKSPACE, "backspace.wav"),
    (Key::TAB, "tab.wav"),
    (Key::ENTER, "enter.wav"),
    (Key::SPACE, "space.wav"),
    // Letters
    (Key::Q, "q.wav"),
    (Key::W, "w.wav"),
    (Key::E, "e.wav"),
    (Key::R, "r.wav"),
    (Key::T, "t.wav"),
    (Key::Y, "y.wav"),
    (Key::U, "u.wav"),
    (Key::I, "i.wav"),
    (Key::O, "o.wav"),
    (Key::P, "p.wav"),
    (Key::A, "a.wav"),
    (Key::S, "s.wav"),
    (Key::D, "d.wav"),
    (Key::F, "f.wav"),
    (Key::G, "g.wav"),
    (Key::H, "h.wav"),
    (Key::J, "j.wav"),
    (Key::K, "k.wav"),
    (Key::L, "l.wav"),
    (Key::Z, "z.wav"),
    (Key::X, "x.wav"),
    (Key::C, "c.wav"),
    (Key::V, "v.wav"),
    (Key::B, "b.wav"),
    (Key::N, "n.wav"),
    (Key::M, "m.wav"),
    // Arrows
    (Key::UP, "g.wav"),
    (Key::LEFT, "c.wav"),
    (Key::RIGHT, "b.wav"),
    (Key::DOWN, "v.wav"),
];
