// Keyclack Input Layer - Event Records
// Decoding of raw `struct input_event` records read from a device node

use std::mem::size_of;

/// EV_KEY event type code from Linux input-event-codes.h
pub const EV_KEY: u16 = 0x01;

/// Size in bytes of one `struct input_event` on this platform.
pub const EVENT_SIZE: usize = size_of::<libc::input_event>();

// type, code and value trail the timestamp, whose width depends on the
// platform's timeval.
const TYPE_OFFSET: usize = EVENT_SIZE - 8;
const CODE_OFFSET: usize = EVENT_SIZE - 6;
const VALUE_OFFSET: usize = EVENT_SIZE - 4;

/// One input event as read from the device, timestamp dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            event_type,
            code,
            value,
        }
    }

    /// Key event with the given code and value
    pub fn key(code: u16, value: i32) -> Self {
        Self::new(EV_KEY, code, value)
    }

    /// Decode one record in native byte order.
    ///
    /// Returns `None` unless `bytes` is exactly [`EVENT_SIZE`] long.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != EVENT_SIZE {
            return None;
        }
        let event_type = u16::from_ne_bytes([bytes[TYPE_OFFSET], bytes[TYPE_OFFSET + 1]]);
        let code = u16::from_ne_bytes([bytes[CODE_OFFSET], bytes[CODE_OFFSET + 1]]);
        let value = i32::from_ne_bytes([
            bytes[VALUE_OFFSET],
            bytes[VALUE_OFFSET + 1],
            bytes[VALUE_OFFSET + 2],
            bytes[VALUE_OFFSET + 3],
        ]);
        Some(Self::new(event_type, code, value))
    }

    /// Encode as a native record with a zero timestamp
    pub fn to_bytes(&self) -> [u8; EVENT_SIZE] {
        let mut bytes = [0u8; EVENT_SIZE];
        bytes[TYPE_OFFSET..CODE_OFFSET].copy_from_slice(&self.event_type.to_ne_bytes());
        bytes[CODE_OFFSET..VALUE_OFFSET].copy_from_slice(&self.code.to_ne_bytes());
        bytes[VALUE_OFFSET..].copy_from_slice(&self.value.to_ne_bytes());
        bytes
    }

    pub fn is_key_event(&self) -> bool {
        is_key_event(self.event_type)
    }

    /// Press/release/repeat classification, for key events only
    pub fn action(&self) -> Option<KeyAction> {
        if !self.is_key_event() {
            return None;
        }
        KeyAction::from_value(self.value)
    }
}

/// Key state transition carried in an EV_KEY value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Release,
    Press,
    Repeat,
}

impl KeyAction {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyAction::Release),
            1 => Some(KeyAction::Press),
            2 => Some(KeyAction::Repeat),
            _ => None,
        }
    }
}

/// Check if an event type is a key event.
pub fn is_key_event(event_type: u16) -> bool {
    event_type == EV_KEY
}
