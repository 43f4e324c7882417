// Keyclack Key Type
// Key codes from Linux input-event-codes.h and their symbolic names

use std::fmt;
use std::str::FromStr;

/// Represents a single keyboard key code.
///
/// Newtype wrapper around u16. The numeric values match Linux
/// input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {
    pub const ESC: Key = Key(1);
    pub const KEY_1: Key = Key(2);
    pub const KEY_2: Key = Key(3);
    pub const KEY_3: Key = Key(4);
    pub const KEY_4: Key = Key(5);
    pub const KEY_5: Key = Key(6);
    pub const KEY_6: Key = Key(7);
    pub const KEY_7: Key = Key(8);
    pub const KEY_8: Key = Key(9);
    pub const KEY_9: Key = Key(10);
    pub const KEY_0: Key = Key(11);
    pub const MINUS: Key = Key(12);
    pub const EQUAL: Key = Key(13);
    pub const BACKSPACE: Key = Key(14);
    pub const TAB: Key = Key(15);
    pub const Q: Key = Key(16);
    pub const W: Key = Key(17);
    pub const E: Key = Key(18);
    pub const R: Key = Key(19);
    pub const T: Key = Key(20);
    pub const Y: Key = Key(21);
    pub const U: Key = Key(22);
    pub const I: Key = Key(23);
    pub const O: Key = Key(24);
    pub const P: Key = Key(25);
    pub const LEFT_BRACE: Key = Key(26);
    pub const RIGHT_BRACE: Key = Key(27);
    pub const ENTER: Key = Key(28);
    pub const LEFT_CTRL: Key = Key(29);
    pub const A: Key = Key(30);
    pub const S: Key = Key(31);
    pub const D: Key = Key(32);
    pub const F: Key = Key(33);
    pub const G: Key = Key(34);
    pub const H: Key = Key(35);
    pub const J: Key = Key(36);
    pub const K: Key = Key(37);
    pub const L: Key = Key(38);
    pub const SEMICOLON: Key = Key(39);
    pub const APOSTROPHE: Key = Key(40);
    pub const GRAVE: Key = Key(41);
    pub const LEFT_SHIFT: Key = Key(42);
    pub const BACKSLASH: Key = Key(43);
    pub const Z: Key = Key(44);
    pub const X: Key = Key(45);
    pub const C: Key = Key(46);
    pub const V: Key = Key(47);
    pub const B: Key = Key(48);
    pub const N: Key = Key(49);
    pub const M: Key = Key(50);
    pub const COMMA: Key = Key(51);
    pub const DOT: Key = Key(52);
    pub const SLASH: Key = Key(53);
    pub const RIGHT_SHIFT: Key = Key(54);
    pub const LEFT_ALT: Key = Key(56);
    pub const SPACE: Key = Key(57);
    pub const CAPSLOCK: Key = Key(58);
    pub const RIGHT_CTRL: Key = Key(97);
    pub const RIGHT_ALT: Key = Key(100);
    pub const UP: Key = Key(103);
    pub const LEFT: Key = Key(105);
    pub const RIGHT: Key = Key(106);
    pub const DOWN: Key = Key(108);

    /// Get the raw numeric code value
    pub fn code(self) -> u16 {
        self.0
    }

    /// Get the name of this key
    pub fn name(self) -> &'static str {
        key_name(self.0)
    }
}

impl From<u16> for Key {
    fn from(code: u16) -> Self {
        Key(code)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_from_name(s).ok_or_else(|| format!("Unknown key: {}", s))
    }
}

// (code, canonical name) for the main keyboard block, function rows,
// navigation cluster and common media keys.
const KEY_NAMES: &[(u16, &str)] = &[
    (0, "RESERVED"),
    (1, "ESC"),
    (2, "KEY_1"),
    (3, "KEY_2"),
    (4, "KEY_3"),
    (5, "KEY_4"),
    (6, "KEY_5"),
    (7, "KEY_6"),
    (8, "KEY_7"),
    (9, "KEY_8"),
    (10, "KEY_9"),
    (11, "KEY_0"),
    (12, "MINUS"),
    (13, "EQUAL"),
    (14, "BACKSPACE"),
    (15, "TAB"),
    (16, "Q"),
    (17, "W"),
    (18, "E"),
    (19, "R"),
    (20, "T"),
    (21, "Y"),
    (22, "U"),
    (23, "I"),
    (24, "O"),
    (25, "P"),
    (26, "LEFT_BRACE"),
    (27, "RIGHT_BRACE"),
    (28, "ENTER"),
    (29, "LEFT_CTRL"),
    (30, "A"),
    (31, "S"),
    (32, "D"),
    (33, "F"),
    (34, "G"),
    (35, "H"),
    (36, "J"),
    (37, "K"),
    (38, "L"),
    (39, "SEMICOLON"),
    (40, "APOSTROPHE"),
    (41, "GRAVE"),
    (42, "LEFT_SHIFT"),
    (43, "BACKSLASH"),
    (44, "Z"),
    (45, "X"),
    (46, "C"),
    (47, "V"),
    (48, "B"),
    (49, "N"),
    (50, "M"),
    (51, "COMMA"),
    (52, "DOT"),
    (53, "SLASH"),
    (54, "RIGHT_SHIFT"),
    (55, "KPASTERISK"),
    (56, "LEFT_ALT"),
    (57, "SPACE"),
    (58, "CAPSLOCK"),
    (59, "F1"),
    (60, "F2"),
    (61, "F3"),
    (62, "F4"),
    (63, "F5"),
    (64, "F6"),
    (65, "F7"),
    (66, "F8"),
    (67, "F9"),
    (68, "F10"),
    (69, "NUMLOCK"),
    (70, "SCROLLLOCK"),
    (71, "KP7"),
    (72, "KP8"),
    (73, "KP9"),
    (74, "KPMINUS"),
    (75, "KP4"),
    (76, "KP5"),
    (77, "KP6"),
    (78, "KPPLUS"),
    (79, "KP1"),
    (80, "KP2"),
    (81, "KP3"),
    (82, "KP0"),
    (83, "KPDOT"),
    (86, "KEY_102ND"),
    (87, "F11"),
    (88, "F12"),
    (96, "KPENTER"),
    (97, "RIGHT_CTRL"),
    (98, "KPSLASH"),
    (99, "SYSRQ"),
    (100, "RIGHT_ALT"),
    (102, "HOME"),
    (103, "UP"),
    (104, "PAGE_UP"),
    (105, "LEFT"),
    (106, "RIGHT"),
    (107, "END"),
    (108, "DOWN"),
    (109, "PAGE_DOWN"),
    (110, "INSERT"),
    (111, "DELETE"),
    (113, "MUTE"),
    (114, "VOLUMEDOWN"),
    (115, "VOLUMEUP"),
    (119, "PAUSE"),
    (125, "LEFT_META"),
    (126, "RIGHT_META"),
    (127, "COMPOSE"),
    (128, "STOP"),
    (129, "AGAIN"),
    (130, "PROPS"),
    (131, "UNDO"),
    (132, "FRONT"),
    (133, "COPY"),
    (134, "OPEN"),
    (135, "PASTE"),
    (136, "FIND"),
    (137, "CUT"),
    (138, "HELP"),
    (139, "MENU"),
    (140, "CALC"),
    (141, "SETUP"),
    (142, "SLEEP"),
    (143, "WAKEUP"),
    (144, "FILE"),
    (148, "PROG1"),
    (149, "PROG2"),
    (150, "WWW"),
    (152, "SCREENLOCK"),
    (155, "MAIL"),
    (156, "BOOKMARKS"),
    (157, "COMPUTER"),
    (158, "BACK"),
    (159, "FORWARD"),
    (160, "CLOSECD"),
    (161, "EJECTCD"),
    (162, "EJECTCLOSECD"),
    (163, "NEXTSONG"),
    (164, "PLAYPAUSE"),
    (165, "PREVIOUSSONG"),
    (166, "STOPCD"),
    (167, "RECORD"),
    (168, "REWIND"),
    (169, "PHONE"),
    (172, "HOMEPAGE"),
    (173, "REFRESH"),
    (174, "EXIT"),
    (177, "SCROLLUP"),
    (178, "SCROLLDOWN"),
    (179, "KPLEFTPAREN"),
    (180, "KPRIGHTPAREN"),
    (181, "NEW"),
    (182, "REDO"),
    (183, "F13"),
    (184, "F14"),
    (185, "F15"),
    (186, "F16"),
    (187, "F17"),
    (188, "F18"),
    (189, "F19"),
    (190, "F20"),
    (191, "F21"),
    (192, "F22"),
    (193, "F23"),
    (194, "F24"),
    (200, "PLAYCD"),
    (201, "PAUSECD"),
    (205, "SUSPEND"),
    (206, "CLOSE"),
    (207, "PLAY"),
    (208, "FASTFORWARD"),
    (210, "PRINT"),
    (212, "CAMERA"),
    (215, "EMAIL"),
    (217, "SEARCH"),
    (223, "CANCEL"),
    (224, "BRIGHTNESSDOWN"),
    (225, "BRIGHTNESSUP"),
    (226, "MEDIA"),
    (228, "KBDILLUMTOGGLE"),
    (229, "KBDILLUMDOWN"),
    (230, "KBDILLUMUP"),
    (234, "SAVE"),
    (237, "BLUETOOTH"),
    (238, "WLAN"),
    (247, "RFKILL"),
    (248, "MICMUTE"),
];

/// Display name for a key code
pub fn key_name(code: u16) -> &'static str {
    KEY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("UNKNOWN")
}

/// Look up a key by name.
///
/// Case-insensitive; accepts an optional `KEY_` prefix (`KEY_A`, `a`) and the
/// kernel spellings without underscores (`LEFTCTRL`, `LEFTBRACE`). Anything
/// else that parses as a decimal number is taken as a raw key code, so codes
/// without a name stay reachable. Single digits name the number row keys.
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.trim().to_ascii_uppercase();
    let stripped = upper.strip_prefix("KEY_").unwrap_or(upper.as_str());
    let compact: String = stripped.chars().filter(|c| *c != '_').collect();

    KEY_NAMES
        .iter()
        .find(|(_, candidate)| {
            let candidate: &str = candidate.strip_prefix("KEY_").unwrap_or(*candidate);
            candidate == stripped || candidate.replace('_', "") == compact
        })
        .map(|(code, _)| Key(*code))
        .or_else(|| stripped.parse::<u16>().ok().map(Key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_name_known() {
        assert_eq!(Key::A.name(), "A");
        assert_eq!(Key::LEFT_CTRL.name(), "LEFT_CTRL");
        assert_eq!(Key::KEY_1.to_string(), "KEY_1");
    }

    #[test]
    fn test_key_name_unknown() {
        assert_eq!(key_name(0x2ff), "UNKNOWN");
    }

    #[test]
    fn test_key_from_name_variants() {
        assert_eq!(key_from_name("a"), Some(Key::A));
        assert_eq!(key_from_name("KEY_A"), Some(Key::A));
        assert_eq!(key_from_name("LEFTCTRL"), Some(Key::LEFT_CTRL));
        assert_eq!(key_from_name("left_ctrl"), Some(Key::LEFT_CTRL));
        assert_eq!(key_from_name("1"), Some(Key::KEY_1));
        assert_eq!(key_from_name("KEY_0"), Some(Key::KEY_0));
        assert_eq!(key_from_name("capslock"), Some(Key::CAPSLOCK));
    }

    #[test]
    fn test_upper_range_names() {
        assert_eq!(key_from_name("F13"), Some(Key(183)));
        assert_eq!(key_from_name("KEY_NEXTSONG"), Some(Key(163)));
        assert_eq!(key_from_name("micmute"), Some(Key(248)));
        assert_eq!(Key(164).name(), "PLAYPAUSE");
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(key_from_name("250"), Some(Key(250)));
        assert_eq!(key_from_name("300"), Some(Key(300)));
        // Single digits stay number row keys, not raw codes
        assert_eq!(key_from_name("2"), Some(Key::KEY_2));
        assert_eq!(key_from_name("99999"), None);
    }

    #[test]
    fn test_key_from_str_unknown() {
        let err = "NOT_A_KEY".parse::<Key>().unwrap_err();
        assert!(err.contains("NOT_A_KEY"));
    }

    #[test]
    fn test_constants_match_kernel_codes() {
        assert_eq!(Key::C.code(), 46);
        assert_eq!(Key::RIGHT_CTRL.code(), 97);
        assert_eq!(Key::SPACE.code(), 57);
        assert_eq!(u16::from(Key::DOWN), 108);
    }
}
