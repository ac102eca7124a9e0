//! Per-test muting of all output
//!
//! [`MuteLogging`] silences everything a test logs or prints and shows it
//! only if the test fails:
//!
//! ```
//! use logtap_testlib::MuteLogging;
//!
//! let answer = MuteLogging::new()
//!     .run(|| {
//!         tracing::warn!(target: "docs::mute", "noise nobody needs to see");
//!         42
//!     })
//!     .unwrap();
//! assert_eq!(answer, 42);
//! ```

use crate::errors::Result;
use crate::mute::tap::MutingLoggerTap;
use logtap_core_types::schema::LIBRARY_LOGGER;
use logtap_logging::console::{console, Sink};
use std::any::Any;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};

/// What a lifecycle hook can learn about the running test
pub trait ExtensionContext {
    /// The error the test body failed with, if it failed
    fn execution_error(&self) -> Option<&(dyn Error + 'static)>;

    fn has_failed(&self) -> bool {
        self.execution_error().is_some()
    }
}

/// Hook run before each test body
pub trait BeforeEachCallback {
    /// # Errors
    ///
    /// Returns an error if the hook cannot prepare the test.
    fn before_each(&mut self, context: &dyn ExtensionContext) -> Result<()>;
}

/// Hook run after each test body, whatever its outcome
pub trait AfterEachCallback {
    /// # Errors
    ///
    /// Returns an error if the hook cannot clean up after the test.
    fn after_each(&mut self, context: &dyn ExtensionContext) -> Result<()>;
}

/// Failure of a test body
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TestFailure {
    message: String,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of running a test body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Succeeded,
    Failed(TestFailure),
}

impl TestOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        TestOutcome::Failed(TestFailure::new(message))
    }

    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "test panicked".to_string());
        TestOutcome::failed(message)
    }
}

impl ExtensionContext for TestOutcome {
    fn execution_error(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TestOutcome::Succeeded => None,
            TestOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Mutes logging and console output for the duration of a test
///
/// Before the test, a [`MutingLoggerTap`] is installed on the root logger and
/// both console streams are redirected into the tap's stream. After the test
/// everything is restored; if the test failed, the collected output is
/// written to the console error stream.
pub struct MuteLogging {
    tap: MutingLoggerTap,
    console: Option<(Sink, Sink)>,
}

impl MuteLogging {
    pub fn new() -> Self {
        Self {
            tap: MutingLoggerTap::root(),
            console: None,
        }
    }

    /// Bytes collected during the current or last test
    pub fn muted_size(&self) -> usize {
        self.tap.stream_size()
    }

    fn restore_console(&mut self) {
        if let Some((out, err)) = self.console.take() {
            console().set_out(out);
            console().set_err(err);
        }
    }

    /// Run `test` between the before and after hooks
    ///
    /// A panic in `test` counts as failure; it is resumed once the after hook
    /// has replayed the muted output, even if that hook fails.
    ///
    /// # Errors
    ///
    /// Returns the error of a failing hook when `test` did not panic.
    pub fn run<T, F>(&mut self, test: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        self.before_each(&TestOutcome::Succeeded)?;
        let result = panic::catch_unwind(AssertUnwindSafe(test));
        let outcome = match &result {
            Ok(_) => TestOutcome::Succeeded,
            Err(payload) => TestOutcome::from_panic(&**payload),
        };
        let hook = self.after_each(&outcome);
        match result {
            Ok(value) => hook.map(|()| value),
            Err(payload) => {
                // The test's own panic takes precedence over a failing hook.
                if let Err(err) = hook {
                    tracing::error!(target: LIBRARY_LOGGER, error = %err, "after-each hook failed");
                }
                panic::resume_unwind(payload)
            }
        }
    }
}

impl Default for MuteLogging {
    fn default() -> Self {
        Self::new()
    }
}

impl BeforeEachCallback for MuteLogging {
    fn before_each(&mut self, _context: &dyn ExtensionContext) -> Result<()> {
        // Refused before touching the buffer of the running session.
        self.tap.install()?;
        if self.console.is_none() {
            let out = console().set_out(Box::new(self.tap.stream().clone()));
            let err = console().set_err(Box::new(self.tap.stream().clone()));
            self.console = Some((out, err));
        }
        Ok(())
    }
}

impl AfterEachCallback for MuteLogging {
    fn after_each(&mut self, context: &dyn ExtensionContext) -> Result<()> {
        self.restore_console();
        self.tap.remove();
        if context.has_failed() {
            self.tap.flush_to(&mut console().err())?;
        }
        Ok(())
    }
}

impl Drop for MuteLogging {
    fn drop(&mut self) {
        self.restore_console();
    }
}
