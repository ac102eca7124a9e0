//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use crate::format::Format;
use crate::handler::{ConsoleHandler, Handler};
use crate::layer::LoggingLayer;
use crate::registry::Logger;
use logtap_core_types::schema::{ENV_LOG_DIRECTIVES, LIBRARY_LOGGER};
use logtap_core_types::LoggerName;
use std::str::FromStr;
use std::sync::{Arc, Once};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output at debug level
    Development,
    /// JSON structured output at info level
    Production,
    /// Human-readable output at info level, for test runs
    Test,
}

/// Errors raised while reading logging configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid level `{level}` in directive `{directive}`")]
    InvalidLevel { directive: String, level: String },

    #[error("Empty logger name in directive `{directive}`")]
    EmptyLoggerName { directive: String },
}

/// Root level, output format and per-logger levels
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub root_level: LevelFilter,
    pub format: Format,
    pub levels: Vec<(LoggerName, LevelFilter)>,
}

impl LoggingConfig {
    pub fn for_profile(profile: Profile) -> Self {
        let (root_level, format) = match profile {
            Profile::Development => (LevelFilter::DEBUG, Format::Text),
            Profile::Production => (LevelFilter::INFO, Format::Json),
            Profile::Test => (LevelFilter::INFO, Format::Text),
        };
        Self {
            root_level,
            format,
            levels: Vec::new(),
        }
    }

    /// Apply comma-separated directives such as `warn,app::db=debug`
    ///
    /// A bare level sets the root level; `name=level` sets the level of one
    /// logger. Later directives win.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown level or an empty logger name.
    pub fn with_directives(mut self, directives: &str) -> Result<Self, ConfigError> {
        for directive in directives.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((name, level)) => {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(ConfigError::EmptyLoggerName {
                            directive: directive.to_string(),
                        });
                    }
                    let level = parse_level(directive, level.trim())?;
                    self.levels.push((LoggerName::new(name), level));
                }
                None => self.root_level = parse_level(directive, directive)?,
            }
        }
        Ok(self)
    }

    /// Apply the directives of the `LOGTAP_LOG` environment variable, if set
    ///
    /// An invalid value leaves the configuration unchanged.
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(ENV_LOG_DIRECTIVES) {
            Ok(value) => match self.clone().with_directives(&value) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("ignoring {}: {}", ENV_LOG_DIRECTIVES, err);
                    self
                }
            },
            Err(_) => self,
        }
    }

    /// Configure the global logger registry
    ///
    /// Console handlers of the root and library loggers are replaced by one
    /// using the configured format; other handlers, including ones attached
    /// before initialization, stay in place.
    pub fn apply(&self) {
        let root = Logger::root();
        root.set_level(Some(self.root_level));
        install_console(&root, self.format);
        install_console(&Logger::get(LIBRARY_LOGGER), self.format);
        for (name, level) in &self.levels {
            Logger::get(name).set_level(Some(*level));
        }
    }
}

fn install_console(logger: &Logger, format: Format) {
    let console: Arc<dyn Handler> = Arc::new(ConsoleHandler::new(format));
    let mut handlers = vec![console];
    handlers.extend(logger.handlers().into_iter().filter(|h| !h.is_console()));
    logger.set_handlers(handlers);
}

fn parse_level(directive: &str, level: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(level).map_err(|_| ConfigError::InvalidLevel {
        directive: directive.to_string(),
        level: level.to_string(),
    })
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Configures the logger registry for `profile` (plus any `LOGTAP_LOG`
/// overrides) and installs a `tracing` subscriber that routes events into it.
/// Only the first call has any effect.
///
/// # Example
///
/// ```
/// use logtap_logging::{init, Profile};
///
/// init(Profile::Test);
/// ```
pub fn init(profile: Profile) {
    init_with_config(LoggingConfig::for_profile(profile).with_env_overrides());
}

/// Initialize the logging facility with an explicit configuration
///
/// Only the first call to this function or [`init`] has any effect.
pub fn init_with_config(config: LoggingConfig) {
    INIT_ONCE.call_once(|| {
        config.apply();
        // Another global subscriber may already be installed; events then
        // reach the registry only through `Logger` handles.
        tracing_subscriber::registry()
            .with(LoggingLayer::new())
            .try_init()
            .ok();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::MemoizingStream;
    use crate::handler::StreamHandler;
    use serial_test::serial;

    #[test]
    fn test_init_idempotent() {
        // Multiple calls should not panic
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Production);
    }

    #[test]
    fn test_profile_equality() {
        assert_eq!(Profile::Development, Profile::Development);
        assert_ne!(Profile::Development, Profile::Production);
    }

    #[test]
    fn test_profile_defaults() {
        let dev = LoggingConfig::for_profile(Profile::Development);
        assert_eq!(dev.root_level, LevelFilter::DEBUG);
        assert_eq!(dev.format, Format::Text);

        let prod = LoggingConfig::for_profile(Profile::Production);
        assert_eq!(prod.root_level, LevelFilter::INFO);
        assert_eq!(prod.format, Format::Json);
    }

    #[test]
    fn test_directives_set_root_and_logger_levels() {
        let config = LoggingConfig::for_profile(Profile::Test)
            .with_directives("warn, app::db=debug,test.x=trace")
            .unwrap();

        assert_eq!(config.root_level, LevelFilter::WARN);
        assert_eq!(
            config.levels,
            vec![
                (LoggerName::new("app::db"), LevelFilter::DEBUG),
                (LoggerName::new("test.x"), LevelFilter::TRACE),
            ]
        );
    }

    #[test]
    fn test_directives_accept_off() {
        let config = LoggingConfig::for_profile(Profile::Test)
            .with_directives("noisy=off")
            .unwrap();
        assert_eq!(config.levels[0].1, LevelFilter::OFF);
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = LoggingConfig::for_profile(Profile::Test)
            .with_directives("app=loud")
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidLevel {
                directive: "app=loud".to_string(),
                level: "loud".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_logger_name_is_rejected() {
        let err = LoggingConfig::for_profile(Profile::Test)
            .with_directives("=debug")
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyLoggerName { .. }));
    }

    #[test]
    #[serial]
    fn test_apply_keeps_handlers_attached_before_init() {
        let root = Logger::root();
        let library = Logger::get(LIBRARY_LOGGER);
        let saved_root = root.handlers();
        let saved_library = library.handlers();
        let saved_level = root.level();

        let early: Arc<dyn Handler> = Arc::new(StreamHandler::new(MemoizingStream::new()));
        root.add_handler(early.clone());

        LoggingConfig::for_profile(Profile::Production).apply();
        LoggingConfig::for_profile(Profile::Production).apply();

        let handlers = root.handlers();
        let others = saved_root.iter().filter(|h| !h.is_console()).count();
        assert_eq!(handlers.len(), others + 2);
        assert!(handlers.iter().any(|h| Arc::ptr_eq(h, &early)));
        assert_eq!(handlers.iter().filter(|h| h.is_console()).count(), 1);
        assert_eq!(library.handlers().len(), 1);

        root.set_handlers(saved_root);
        root.set_level(saved_level);
        library.set_handlers(saved_library);
    }
}
