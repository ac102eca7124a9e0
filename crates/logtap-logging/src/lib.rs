//! Named-logger facility for logtap
//!
//! This crate provides the logging API the test library builds on:
//! - A process-wide registry of named loggers with levels, handler lists and
//!   a use-parent-handlers flag (`Logger`, `LoggerRegistry`)
//! - Handlers writing to arbitrary writers or to the console
//! - A swappable console so tests can observe standard output and error
//! - A `tracing` layer routing events to the logger named by their target
//! - Single initialization via `init(profile)`
//!
//! # Usage
//!
//! ```rust
//! use logtap_logging::{init, Logger, Profile};
//!
//! init(Profile::Test);
//! tracing::info!(target: "app::db", "connected");
//! Logger::get("app::db").warn("pool is almost exhausted");
//! ```

pub mod buffer;
pub mod console;
pub mod format;
pub mod handler;
pub mod init;
pub mod layer;
pub mod record;
pub mod registry;

pub use buffer::MemoizingStream;
pub use console::{console, tap_console, ConsoleCapture, Stream};
pub use format::Format;
pub use handler::{ConsoleHandler, Handler, StreamHandler};
pub use init::{init, init_with_config, ConfigError, LoggingConfig, Profile};
pub use layer::LoggingLayer;
pub use logtap_core_types::LoggerName;
pub use record::{CapturedError, LogRecord, Param};
pub use registry::{Logger, LoggerRegistry};

pub use tracing::level_filters::LevelFilter;
pub use tracing::Level;
