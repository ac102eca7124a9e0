use logtap_core_types::LoggerName;
use thiserror::Error;

/// Result type alias using TestLibError
pub type Result<T> = std::result::Result<T, TestLibError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable in assertions about errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation was called in a state that does not allow it
    IllegalState,
    /// A logger is already intercepted by the same interceptor
    AlreadyIntercepted,
    /// A tap is already installed
    AlreadyInstalled,
    /// Writing to an external sink failed
    Io,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::IllegalState => "ERR_ILLEGAL_STATE",
            ErrorKind::AlreadyIntercepted => "ERR_ALREADY_INTERCEPTED",
            ErrorKind::AlreadyInstalled => "ERR_ALREADY_INSTALLED",
            ErrorKind::Io => "ERR_IO",
        }
    }
}

/// Errors raised by the test library
#[derive(Error, Debug)]
pub enum TestLibError {
    #[error("Illegal state: {reason}")]
    IllegalState { reason: String },

    #[error("Logger {logger} is already intercepted; call `release()` first")]
    AlreadyIntercepted { logger: LoggerName },

    #[error("Tap for logger {logger} is already installed; call `remove()` first")]
    AlreadyInstalled { logger: LoggerName },

    #[error("I/O error in operation '{op}': {source}")]
    Io {
        op: String,
        #[source]
        source: std::io::Error,
    },
}

impl TestLibError {
    pub fn illegal_state(reason: impl Into<String>) -> Self {
        TestLibError::IllegalState {
            reason: reason.into(),
        }
    }

    pub fn io(op: impl Into<String>, source: std::io::Error) -> Self {
        TestLibError::Io {
            op: op.into(),
            source,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            TestLibError::IllegalState { .. } => ErrorKind::IllegalState,
            TestLibError::AlreadyIntercepted { .. } => ErrorKind::AlreadyIntercepted,
            TestLibError::AlreadyInstalled { .. } => ErrorKind::AlreadyInstalled,
            TestLibError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
