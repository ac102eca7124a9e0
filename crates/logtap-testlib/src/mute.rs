//! Keeping test output quiet
//!
//! - `MutingLoggerTap` sends one logger's output into memory
//! - `MuteLogging` mutes a whole test and replays the output on failure
//! - `with_logging_muted_in` turns loggers off around a closure

pub mod extension;
pub mod muting;
pub mod tap;

pub use extension::{
    AfterEachCallback, BeforeEachCallback, ExtensionContext, MuteLogging, TestFailure, TestOutcome,
};
pub use muting::{with_logging_muted_in, MutedLoggers};
pub use tap::MutingLoggerTap;
