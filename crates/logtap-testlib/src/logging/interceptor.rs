//! Interception of the records of one logger
//!
//! # Example
//!
//! ```
//! use logtap_testlib::{Interceptor, LevelFilter};
//!
//! let mut interceptor = Interceptor::new("billing::invoice", LevelFilter::DEBUG);
//! interceptor.intercept().unwrap();
//!
//! tracing::debug!(target: "billing::invoice", amount = 42, "invoice created");
//!
//! let log = interceptor.assert_log().unwrap();
//! log.has_size(1);
//! log.last_record().is_debug();
//! log.last_record().has_parameters_that().contains_entry("amount", "42");
//!
//! interceptor.release();
//! ```

use crate::errors::{Result, TestLibError};
use crate::logging::assertions::LoggingAssertions;
use crate::logging::handler::CaptureHandler;
use logtap_core_types::schema::LIBRARY_LOGGER;
use logtap_logging::{init, Handler, LevelFilter, Logger, LoggerName, Profile};
use std::sync::Arc;

/// Captures the records of a logger for assertions
///
/// While intercepting, the logger's level is set to the interception level
/// and its records no longer propagate to parent handlers, so nothing else
/// sees them. [`Interceptor::release`] (or dropping the interceptor) restores
/// the level and the use-parent-handlers flag exactly.
///
/// One interceptor per logger at a time: two interceptors on the same logger
/// would each restore the configuration the other one installed.
pub struct Interceptor {
    logger: Logger,
    level: LevelFilter,
    previous_level: Option<LevelFilter>,
    use_parent_handlers: bool,
    handler: Option<Arc<CaptureHandler>>,
}

impl Interceptor {
    /// Create an interceptor for `target` capturing records at `level` and above
    ///
    /// The logger's current level is remembered as the previous level.
    pub fn new(target: impl Into<LoggerName>, level: LevelFilter) -> Self {
        init(Profile::Test);
        let logger = Logger::get(target);
        let previous_level = logger.level();
        let use_parent_handlers = logger.use_parent_handlers();
        Self {
            logger,
            level,
            previous_level,
            use_parent_handlers,
            handler: None,
        }
    }

    /// Create an interceptor for the logger of a module
    ///
    /// Pass `module_path!()` to intercept events emitted from the calling
    /// module with the default `tracing` target.
    pub fn for_module(module_path: &str, level: LevelFilter) -> Self {
        Self::new(module_path, level)
    }

    /// Create an interceptor for the logger of the module declaring `T`
    pub fn for_type<T: ?Sized>(level: LevelFilter) -> Self {
        Self::new(LoggerName::of::<T>(), level)
    }

    /// Install a fresh capture handler on the logger
    ///
    /// # Errors
    ///
    /// Returns [`TestLibError::AlreadyIntercepted`] if this interceptor has not
    /// been released since the last call. The logger is left untouched.
    pub fn intercept(&mut self) -> Result<()> {
        if self.handler.is_some() {
            return Err(TestLibError::AlreadyIntercepted {
                logger: self.logger.name().clone(),
            });
        }

        tracing::debug!(
            target: LIBRARY_LOGGER,
            logger = %self.logger.name(),
            level = %self.level,
            "intercepting logger"
        );

        let handler = Arc::new(CaptureHandler::new(self.level));
        self.use_parent_handlers = self.logger.use_parent_handlers();
        self.previous_level = self.logger.level();

        self.logger.set_level(Some(self.level));
        self.logger.add_handler(handler.clone() as Arc<dyn Handler>);
        self.logger.set_use_parent_handlers(false);
        self.handler = Some(handler);
        Ok(())
    }

    /// Return the logger configuration to its state before interception
    ///
    /// Does nothing if the interceptor is not intercepting.
    pub fn release(&mut self) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        self.logger.remove_handler(&(handler as Arc<dyn Handler>));
        self.logger.set_use_parent_handlers(self.use_parent_handlers);
        self.logger.set_level(self.previous_level);

        tracing::debug!(target: LIBRARY_LOGGER, logger = %self.logger.name(), "released logger");
    }

    /// Assertions over the records captured since interception
    ///
    /// # Errors
    ///
    /// Returns [`TestLibError::IllegalState`] before [`Interceptor::intercept`]
    /// or after [`Interceptor::release`].
    pub fn assert_log(&self) -> Result<LoggingAssertions> {
        self.handler
            .as_ref()
            .map(|handler| LoggingAssertions::new(handler.clone()))
            .ok_or_else(|| {
                TestLibError::illegal_state(
                    "The handler is not available. Please call `intercept()`.",
                )
            })
    }

    /// The logger whose records are intercepted
    pub fn logging_target(&self) -> &LoggerName {
        self.logger.name()
    }

    /// The minimum level of intercepted records
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// The explicit level of the logger before interception, `None` if inherited
    pub fn previous_level(&self) -> Option<LevelFilter> {
        self.previous_level
    }

    pub fn is_intercepting(&self) -> bool {
        self.handler.is_some()
    }
}

impl Drop for Interceptor {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    struct Marker;

    #[test]
    fn test_assert_log_before_intercept_is_illegal_state() {
        let interceptor = Interceptor::new("interceptor_unit.before", LevelFilter::INFO);
        let err = interceptor.assert_log().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn test_double_intercept_fails_without_side_effects() {
        let mut interceptor = Interceptor::new("interceptor_unit.double", LevelFilter::INFO);
        interceptor.intercept().unwrap();
        let handlers = Logger::get("interceptor_unit.double").handlers().len();

        let err = interceptor.intercept().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyIntercepted);
        assert_eq!(Logger::get("interceptor_unit.double").handlers().len(), handlers);
        interceptor.release();
        assert!(Logger::get("interceptor_unit.double").handlers().is_empty());
    }

    #[test]
    fn test_accessors() {
        let logger = Logger::get("interceptor_unit.accessors");
        logger.set_level(Some(LevelFilter::ERROR));
        let interceptor = Interceptor::new("interceptor_unit.accessors", LevelFilter::DEBUG);

        assert_eq!(interceptor.logging_target().as_str(), "interceptor_unit.accessors");
        assert_eq!(interceptor.level(), LevelFilter::DEBUG);
        assert_eq!(interceptor.previous_level(), Some(LevelFilter::ERROR));
        assert!(!interceptor.is_intercepting());
    }

    #[test]
    fn test_for_type_uses_declaring_module() {
        let interceptor = Interceptor::for_type::<Marker>(LevelFilter::INFO);
        assert_eq!(interceptor.logging_target().as_str(), module_path!());
    }
}
