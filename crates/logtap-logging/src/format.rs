//! Record formatting for stream and console handlers

use crate::record::LogRecord;
use chrono::SecondsFormat;
use serde_json::{json, Map, Value};

/// Output format of a stream handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One human-readable line per record
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Format {
    /// Render a record as a single line, including the trailing newline
    pub fn format(&self, record: &LogRecord) -> String {
        match self {
            Format::Text => format_text(record),
            Format::Json => format_json(record),
        }
    }
}

fn format_text(record: &LogRecord) -> String {
    let mut line = format!(
        "{} {:>5} {}: {}",
        record
            .timestamp()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        record.level(),
        record.logger(),
        record.message()
    );
    for param in record.params() {
        line.push(' ');
        line.push_str(&param.to_string());
    }
    if let Some(error) = record.error() {
        line.push_str(" error=");
        line.push_str(&error.to_string());
    }
    line.push('\n');
    line
}

fn format_json(record: &LogRecord) -> String {
    let mut params = Map::new();
    for param in record.params() {
        params.insert(param.name.clone(), Value::String(param.value.clone()));
    }

    let value = json!({
        "timestamp": record.timestamp().to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": record.level().to_string(),
        "logger": record.logger().as_str(),
        "message": record.message(),
        "params": params,
        "error": record.error(),
    });

    let mut line = value.to_string();
    line.push('\n');
    line
}
