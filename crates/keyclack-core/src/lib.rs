// Keyclack Core Library
// Keyboard discovery, key event handling and sample playback

pub mod config;
pub mod event;
pub mod input;
pub mod key;
pub mod modifier;
pub mod playback;
pub mod shutdown;
pub mod sounds;

pub use config::{default_config_content, Config, ConfigError, ConfigResult};
pub use event::{EventLoop, EventOutcome, LoopExit, LoopStats};
pub use input::{EventSource, KeyAction, RawEvent, ReadOutcome, ReaderSource};
pub use key::Key;
pub use modifier::{ExitChord, ModifierState};
pub use playback::{CommandPlayer, PlaybackCommand, PlaybackError, Player, SessionEnv};
pub use shutdown::ShutdownToken;
pub use sounds::{SoundMap, MAX_KEY_CODE};

#[cfg(feature = "device")]
pub use input::{locate_keyboard, open_keyboard, DeviceError, KeyboardDevice};
