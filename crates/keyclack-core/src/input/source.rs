// Keyclack Input Layer - Event Sources
// Record-at-a-time reading shared by real devices and in-memory streams

use std::io::{self, ErrorKind, Read};

use super::event::{RawEvent, EVENT_SIZE};

/// Result of a single read attempt on an event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A full record was read
    Record(RawEvent),
    /// A read returned the wrong number of bytes; payload is the byte count
    Malformed(usize),
    /// Nothing to read yet (poll timeout, EINTR, EAGAIN)
    Idle,
    /// The stream ended or the device was removed
    Closed,
}

/// Anything that yields input event records one at a time.
pub trait EventSource {
    /// Read at most one record.
    ///
    /// Implementations may block, but should return [`ReadOutcome::Idle`]
    /// periodically so callers can observe cancellation.
    fn next_record(&mut self) -> io::Result<ReadOutcome>;
}

/// Map the result of one `read` into a record buffer to an outcome.
///
/// ENODEV means the device was unplugged and is reported as `Closed`; other
/// errors are returned for the caller to skip.
pub fn classify_read(result: io::Result<usize>, buf: &[u8]) -> io::Result<ReadOutcome> {
    match result {
        Ok(0) => Ok(ReadOutcome::Closed),
        Ok(n) if n == EVENT_SIZE => Ok(RawEvent::from_bytes(&buf[..n])
            .map(ReadOutcome::Record)
            .unwrap_or(ReadOutcome::Malformed(n))),
        Ok(n) => Ok(ReadOutcome::Malformed(n)),
        Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
            Ok(ReadOutcome::Idle)
        }
        Err(e) if e.raw_os_error() == Some(libc::ENODEV) => Ok(ReadOutcome::Closed),
        Err(e) => Err(e),
    }
}

/// Event source over any byte stream.
///
/// Each call issues exactly one `read` of one record's size, like a read on
/// an evdev node. Useful for replaying captured events.
pub struct ReaderSource<R> {
    reader: R,
    buf: [u8; EVENT_SIZE],
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: [0u8; EVENT_SIZE],
        }
    }
}

impl<R: Read> EventSource for ReaderSource<R> {
    fn next_record(&mut self) -> io::Result<ReadOutcome> {
        let result = self.reader.read(&mut self.buf);
        classify_read(result, &self.buf)
    }
}
