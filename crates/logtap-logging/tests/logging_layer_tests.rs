#![allow(clippy::unwrap_used, clippy::expect_used)]

use logtap_logging::{
    init, ConsoleCapture, Handler, LevelFilter, LogRecord, Logger, Profile,
};
use serial_test::serial;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::Level;

#[derive(Default)]
struct RecordingHandler {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingHandler {
    fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Handler for RecordingHandler {
    fn publish(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

fn attach(name: &str) -> Arc<RecordingHandler> {
    init(Profile::Test);
    let logger = Logger::get(name);
    logger.set_use_parent_handlers(false);
    let handler = Arc::new(RecordingHandler::default());
    logger.add_handler(handler.clone());
    handler
}

#[derive(Debug)]
struct StorageError;

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disk full")
    }
}

impl std::error::Error for StorageError {}

#[test]
fn test_tracing_event_reaches_named_logger() {
    let handler = attach("layer_tests.message");

    tracing::info!(target: "layer_tests.message", "hello {}", "world");

    let records = handler.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message(), "hello world");
    assert_eq!(records[0].level(), Level::INFO);
    assert_eq!(records[0].logger().as_str(), "layer_tests.message");
}

#[test]
fn test_event_fields_become_ordered_params() {
    let handler = attach("layer_tests.params");

    tracing::warn!(target: "layer_tests.params", user = "bob", attempt = 3, ok = false, "retrying");

    let record = &handler.records()[0];
    let names: Vec<_> = record.params().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["user", "attempt", "ok"]);
    assert_eq!(record.param("user"), Some("bob"));
    assert_eq!(record.param("attempt"), Some("3"));
    assert_eq!(record.param("ok"), Some("false"));
}

#[test]
fn test_error_field_is_captured_as_error() {
    let handler = attach("layer_tests.error");
    let err = StorageError;

    tracing::error!(
        target: "layer_tests.error",
        error = &err as &(dyn std::error::Error + 'static),
        "write failed"
    );

    let record = &handler.records()[0];
    assert_eq!(record.error().map(|e| e.message()), Some("disk full"));
    assert!(record.params().is_empty());
}

#[test]
fn test_logger_level_filters_tracing_events() {
    let handler = attach("layer_tests.level");
    Logger::get("layer_tests.level").set_level(Some(LevelFilter::WARN));

    tracing::info!(target: "layer_tests.level", "filtered");
    tracing::warn!(target: "layer_tests.level", "kept");

    let records = handler.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message(), "kept");
}

#[test]
fn test_level_changes_take_effect_at_same_callsite() {
    let handler = attach("layer_tests.dynamic");
    let logger = Logger::get("layer_tests.dynamic");

    for level in [LevelFilter::ERROR, LevelFilter::DEBUG] {
        logger.set_level(Some(level));
        tracing::debug!(target: "layer_tests.dynamic", "probe");
    }

    assert_eq!(handler.records().len(), 1);
}

#[test]
#[serial]
fn test_unhandled_records_reach_console_error_stream() {
    init(Profile::Test);
    let capture = ConsoleCapture::install();

    tracing::warn!(target: "layer_tests.console", "to the console");

    assert!(capture.err().contains("to the console"));
    assert_eq!(capture.out_size(), 0);
}

#[test]
#[serial]
fn test_debug_is_dropped_at_default_root_level() {
    init(Profile::Test);
    let capture = ConsoleCapture::install();

    tracing::debug!(target: "layer_tests.quiet", "not shown");

    assert!(!capture.err().contains("not shown"));
}
