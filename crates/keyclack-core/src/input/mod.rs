// Keyclack Input Layer
// Event records, event sources and keyboard discovery

#[cfg(feature = "device")]
mod device;
mod event;
mod source;

#[cfg(feature = "device")]
pub use device::{
    first_openable, keyboard_candidates, list_keyboards, locate_keyboard, open_keyboard, DeviceError,
    DeviceInfo, DeviceResult, KeyboardDevice,
};
pub use event::{is_key_event, KeyAction, RawEvent, EVENT_SIZE, EV_KEY};
pub use source::{classify_read, EventSource, ReadOutcome, ReaderSource};
