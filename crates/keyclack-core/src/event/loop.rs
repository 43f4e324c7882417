// Keyclack Event Loop
// Reads key events from a source and plays the mapped sample on each press

use crate::input::{EventSource, KeyAction, RawEvent, ReadOutcome};
use crate::modifier::{ExitChord, ModifierState};
use crate::playback::Player;
use crate::shutdown::ShutdownToken;
use crate::SoundMap;

/// Why [`EventLoop::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The shutdown token was cancelled from outside
    Cancelled,
    /// The exit chord was pressed
    ExitChord,
    /// The source reported end of stream or the device went away
    EndOfStream,
}

/// What a single event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Not a key event
    Ignored,
    /// Key event that plays nothing (release, repeat, unmapped)
    Silent,
    /// A player was started for this file
    Played(String),
    /// Playback for this file could not be started
    PlaybackFailed(String),
    /// The exit chord completed
    Exit,
}

/// Counters kept for the shutdown summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub key_events: u64,
    pub played: u64,
    pub playback_failures: u64,
    pub malformed_reads: u64,
    pub failed_reads: u64,
}

/// Single-threaded key-to-sound loop.
///
/// Generic over where records come from and how samples are played so the
/// same loop drives a real keyboard or a scripted stream.
pub struct EventLoop<S, P> {
    source: S,
    player: P,
    sounds: SoundMap,
    chord: ExitChord,
    modifiers: ModifierState,
    stats: LoopStats,
}

impl<S: EventSource, P: Player> EventLoop<S, P> {
    pub fn new(source: S, player: P, sounds: SoundMap, chord: ExitChord) -> Self {
        Self {
            source,
            player,
            sounds,
            chord,
            modifiers: ModifierState::new(),
            stats: LoopStats::default(),
        }
    }

    /// Run until cancelled, the exit chord, or end of stream.
    ///
    /// Malformed reads, failed reads and non-key records are all skipped;
    /// only a source reporting [`ReadOutcome::Closed`] (device removed) ends
    /// the loop on its own. Pressing the exit chord also cancels `token`.
    pub fn run(&mut self, token: &ShutdownToken) -> LoopExit {
        loop {
            if token.is_cancelled() {
                return LoopExit::Cancelled;
            }

            match self.source.next_record() {
                Ok(ReadOutcome::Record(event)) => {
                    if self.handle_event(&event) == EventOutcome::Exit {
                        token.cancel();
                        return LoopExit::ExitChord;
                    }
                }
                Ok(ReadOutcome::Malformed(n)) => {
                    self.stats.malformed_reads += 1;
                    log::debug!("Discarding short read of {} bytes", n);
                }
                Ok(ReadOutcome::Idle) => {}
                Ok(ReadOutcome::Closed) => return LoopExit::EndOfStream,
                Err(e) => {
                    self.stats.failed_reads += 1;
                    log::debug!("Discarding failed read: {}", e);
                }
            }
        }
    }

    /// Process one decoded record.
    pub fn handle_event(&mut self, event: &RawEvent) -> EventOutcome {
        if !event.is_key_event() {
            return EventOutcome::Ignored;
        }
        self.stats.key_events += 1;

        if self.modifiers.update(&self.chord, event) {
            return EventOutcome::Exit;
        }

        if event.action() != Some(KeyAction::Press) {
            return EventOutcome::Silent;
        }

        let Some(file) = self.sounds.lookup(event.code) else {
            log::trace!("No sound for key code {}", event.code);
            return EventOutcome::Silent;
        };
        let file = file.to_string();

        // Playback is never awaited; a failure is logged and typing goes on.
        match self.player.play(&file) {
            Ok(()) => {
                self.stats.played += 1;
                log::debug!("Key {} -> {}", event.code, file);
                EventOutcome::Played(file)
            }
            Err(e) => {
                self.stats.playback_failures += 1;
                log::warn!("{}", e);
                EventOutcome::PlaybackFailed(file)
            }
        }
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Give back the source and player, e.g. to close the device
    pub fn into_parts(self) -> (S, P) {
        (self.source, self.player)
    }
}
