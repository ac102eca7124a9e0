//! Log handlers
//!
//! A handler receives the records published to the logger it is attached to
//! (and, through parent propagation, to that logger's descendants).

use crate::console::{console, Stream};
use crate::format::Format;
use crate::record::LogRecord;
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tracing::level_filters::LevelFilter;

/// Receiver of published log records
pub trait Handler: Send + Sync {
    /// Handle one record
    ///
    /// Called only for records that passed [`Handler::is_loggable`].
    fn publish(&self, record: &LogRecord);

    /// Minimum level this handler accepts
    fn level(&self) -> LevelFilter {
        LevelFilter::TRACE
    }

    fn is_loggable(&self, record: &LogRecord) -> bool {
        record.level() <= self.level()
    }

    fn flush(&self) {}

    /// Whether this handler writes to the console
    ///
    /// Console handlers are the ones replaced when logging is configured.
    fn is_console(&self) -> bool {
        false
    }
}

/// Writes formatted records to any writer
pub struct StreamHandler<W> {
    writer: Mutex<W>,
    format: Format,
    level: LevelFilter,
}

impl<W: Write + Send> StreamHandler<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            format: Format::Text,
            level: LevelFilter::TRACE,
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }
}

impl<W: Write + Send> Handler for StreamHandler<W> {
    fn publish(&self, record: &LogRecord) {
        let line = self.format.format(record);
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        // A handler has nowhere to report its own failures.
        writer.write_all(line.as_bytes()).ok();
    }

    fn level(&self) -> LevelFilter {
        self.level
    }

    fn flush(&self) {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()
            .ok();
    }
}

/// Writes formatted records to the console error stream
///
/// The root logger carries one of these by default.
pub struct ConsoleHandler {
    format: Format,
    level: LevelFilter,
}

impl ConsoleHandler {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            level: LevelFilter::TRACE,
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(Format::Text)
    }
}

impl Handler for ConsoleHandler {
    fn publish(&self, record: &LogRecord) {
        let line = self.format.format(record);
        console().write_all(Stream::Err, line.as_bytes()).ok();
    }

    fn is_console(&self) -> bool {
        true
    }

    fn level(&self) -> LevelFilter {
        self.level
    }
}
