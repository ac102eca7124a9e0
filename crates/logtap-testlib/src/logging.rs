//! Capturing and asserting on log records
//!
//! - `Interceptor` installs a `CaptureHandler` on a named logger and restores
//!   the logger afterwards
//! - `LoggingAssertions` and `LogRecordSubject` check what was captured

pub mod assertions;
pub mod handler;
pub mod interceptor;
pub mod subject;

pub use assertions::LoggingAssertions;
pub use handler::{CaptureHandler, CapturedRecord};
pub use interceptor::Interceptor;
pub use subject::{
    AssertionFailure, Check, ErrorSubject, Fact, FailureCollector, LevelSubject,
    LogRecordSubject, ParametersSubject, StringSubject, NO_LOG_RECORD,
};
