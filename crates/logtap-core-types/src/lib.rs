//! Core types shared across logtap crates
//!
//! This crate provides the foundational types used by both the logging API
//! and the test library:
//!
//! - **Logger names**: `LoggerName`, a hierarchical logger identifier
//! - **Schema constants**: canonical event field keys

pub mod logger_name;
pub mod schema;

pub use logger_name::LoggerName;
