//! Hierarchical logger names
//!
//! Loggers form a tree: `a::b::c` is a child of `a::b`, which is a child of
//! `a`, which is a child of the root logger. Dotted names (`test.x`) are
//! supported too, so names taken from module paths and names chosen by hand
//! both work.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::ROOT_LOGGER;

/// Name of a logger in the logger tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoggerName(String);

impl LoggerName {
    /// Create a name from any string
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root logger
    pub fn root() -> Self {
        Self(ROOT_LOGGER.to_string())
    }

    /// Name of the logger for the given type
    ///
    /// Uses the module path the type was declared in, which is also the
    /// default `tracing` target of events emitted from that module.
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        // Strip generic arguments before looking for the last path segment.
        let base = full.split('<').next().unwrap_or(full);
        match base.rfind("::") {
            Some(idx) => Self(base[..idx].to_string()),
            None => Self(base.to_string()),
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root logger
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the parent logger, `None` for the root
    pub fn parent(&self) -> Option<LoggerName> {
        if self.is_root() {
            return None;
        }
        let colons = self.0.rfind("::");
        let dot = self.0.rfind('.');
        let cut = match (colons, dot) {
            (Some(c), Some(d)) if d > c => Some(d),
            (Some(c), _) => Some(c),
            (None, Some(d)) => Some(d),
            (None, None) => None,
        };
        Some(match cut {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        })
    }

    /// This name followed by all its ancestors, ending with the root
    pub fn ancestry(&self) -> Vec<LoggerName> {
        let mut chain = vec![self.clone()];
        let mut current = self.parent();
        while let Some(name) = current {
            current = name.parent();
            chain.push(name);
        }
        chain
    }
}

impl fmt::Display for LoggerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for LoggerName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for LoggerName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&LoggerName> for LoggerName {
    fn from(name: &LoggerName) -> Self {
        name.clone()
    }
}
