//! Shared in-memory byte sink

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A growable byte buffer that remembers everything written to it
///
/// Clones share the same buffer, so one clone can be handed to a handler or a
/// console sink while another is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct MemoizingStream {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl MemoizingStream {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.bytes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of bytes accumulated so far
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the accumulated bytes
    pub fn contents(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Accumulated bytes decoded as UTF-8, replacing invalid sequences
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Discard the accumulated bytes
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Write the accumulated bytes to `sink` without clearing them
    ///
    /// # Errors
    ///
    /// Returns the error of the failed write or flush of `sink`.
    pub fn flush_to<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        // Copy first so a sink writing back into this stream cannot deadlock.
        let snapshot = self.contents();
        sink.write_all(&snapshot)?;
        sink.flush()
    }
}

impl Write for MemoizingStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
