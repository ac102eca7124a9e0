//! logtap testlib - log interception and output muting for tests
//!
//! This crate provides the pieces tests use to observe or silence logging:
//! - `Interceptor` captures the records of one logger and restores the
//!   logger's configuration when released
//! - Fluent subjects (`LoggingAssertions`, `LogRecordSubject`) for checking
//!   captured records
//! - `MutingLoggerTap` and `MuteLogging` keep output in memory and only show
//!   it when a test fails
//! - `with_logging_muted_in` turns loggers off around a block
//! - Random test values (`values`)
//!
//! # Usage
//!
//! ```rust
//! use logtap_testlib::{Interceptor, LevelFilter};
//!
//! let mut interceptor = Interceptor::new("orders::checkout", LevelFilter::INFO);
//! interceptor.intercept().unwrap();
//!
//! tracing::info!(target: "orders::checkout", order = 7, "order placed");
//!
//! let log = interceptor.assert_log().unwrap();
//! log.last_record().has_message_that().is_equal_to("order placed");
//! ```

pub mod errors;
pub mod logging;
pub mod mute;
pub mod values;

// Re-export commonly used types
pub use errors::{ErrorKind, Result, TestLibError};
pub use logging::{Check, FailureCollector, Interceptor, LogRecordSubject, LoggingAssertions};
pub use mute::{
    with_logging_muted_in, AfterEachCallback, BeforeEachCallback, ExtensionContext, MuteLogging,
    MutedLoggers, MutingLoggerTap, TestOutcome,
};

pub use logtap_logging::{Level, LevelFilter, Logger, LoggerName};
