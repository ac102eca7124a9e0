//! Canonical schema constants for captured log records
//!
//! These constants name the event fields that receive special treatment when
//! a `tracing` event is turned into a log record.

/// Field holding the formatted message of an event
pub const FIELD_MESSAGE: &str = "message";

/// Field holding the error associated with an event
pub const FIELD_ERROR: &str = "error";

/// Environment variable carrying per-logger level directives
pub const ENV_LOG_DIRECTIVES: &str = "LOGTAP_LOG";

/// Name of the root logger
pub const ROOT_LOGGER: &str = "";

/// Logger receiving the library's own events
///
/// It does not propagate to the root, so intercepting or muting the root never
/// sees them.
pub const LIBRARY_LOGGER: &str = "logtap";
