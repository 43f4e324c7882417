// Keyclack Event Handling
// Key-to-sound event loop

pub mod r#loop;

pub use r#loop::{EventLoop, EventOutcome, LoopExit, LoopStats};
