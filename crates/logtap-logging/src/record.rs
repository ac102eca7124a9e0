//! Log records
//!
//! A `LogRecord` is an immutable snapshot of one emitted event. Records are
//! built from `tracing` events by [`LogRecord::from_event`], or directly with
//! [`LogRecord::new`] when logging through a [`crate::Logger`] handle.

use chrono::{DateTime, Utc};
use logtap_core_types::schema::{FIELD_ERROR, FIELD_MESSAGE};
use logtap_core_types::LoggerName;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::Level;

/// A named value attached to a log event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Snapshot of the error associated with a log event
///
/// The error itself cannot outlive the event, so its message and the messages
/// of its source chain are kept instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedError {
    message: String,
    sources: Vec<String>,
}

impl CapturedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sources: Vec::new(),
        }
    }

    /// Capture an error together with its source chain
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut sources = Vec::new();
        let mut next = err.source();
        while let Some(source) = next {
            sources.push(source.to_string());
            next = source.source();
        }
        Self {
            message: err.to_string(),
            sources,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Messages of the source chain, outermost first
    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for source in &self.sources {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

/// A single emitted log event
#[derive(Debug, Clone)]
pub struct LogRecord {
    logger: LoggerName,
    level: Level,
    message: String,
    timestamp: DateTime<Utc>,
    params: Vec<Param>,
    error: Option<CapturedError>,
    module_path: Option<String>,
    file: Option<String>,
    line: Option<u32>,
}

impl LogRecord {
    /// Create a record stamped with the current time
    pub fn new(logger: impl Into<LoggerName>, level: Level, message: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: message.into(),
            timestamp: Utc::now(),
            params: Vec::new(),
            error: None,
            module_path: None,
            file: None,
            line: None,
        }
    }

    /// Build a record from a `tracing` event
    ///
    /// The event target names the logger. The `message` field becomes the
    /// message, the `error` field becomes the associated error, every other
    /// field becomes a parameter in the order it was recorded.
    pub fn from_event(event: &tracing::Event<'_>) -> Self {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        Self {
            logger: LoggerName::new(metadata.target()),
            level: *metadata.level(),
            message: visitor.message.unwrap_or_default(),
            timestamp: Utc::now(),
            params: visitor.params,
            error: visitor.error,
            module_path: metadata.module_path().map(str::to_string),
            file: metadata.file().map(str::to_string),
            line: metadata.line(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Param::new(name, value));
        self
    }

    pub fn with_error(mut self, error: CapturedError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn logger(&self) -> &LoggerName {
        &self.logger
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Parameters in the order they were recorded
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Value of the first parameter with the given name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn error(&self) -> Option<&CapturedError> {
        self.error.as_ref()
    }

    pub fn module_path(&self) -> Option<&str> {
        self.module_path.as_deref()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

struct FieldVisitor {
    message: Option<String>,
    params: Vec<Param>,
    error: Option<CapturedError>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            message: None,
            params: Vec::new(),
            error: None,
        }
    }

    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            FIELD_MESSAGE => self.message = Some(value),
            FIELD_ERROR => self.error = Some(CapturedError::new(value)),
            name => self.params.push(Param::new(name, value)),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if field.name() == FIELD_ERROR {
            self.error = Some(CapturedError::from_error(value));
        } else {
            self.params.push(Param::new(field.name(), value.to_string()));
        }
    }
}
