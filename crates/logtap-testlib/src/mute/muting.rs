//! Turning loggers off for a block of code

use logtap_logging::{init, LevelFilter, Logger, LoggerName, Profile};

/// Guard holding a set of loggers at `OFF`
///
/// Each logger's explicit level is remembered when the guard is created and
/// put back when it is dropped, including during unwinding.
pub struct MutedLoggers {
    saved: Vec<(Logger, Option<LevelFilter>)>,
}

impl MutedLoggers {
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<LoggerName>,
    {
        init(Profile::Test);
        let saved = names
            .into_iter()
            .map(|name| {
                let logger = Logger::get(name);
                let level = logger.level();
                logger.set_level(Some(LevelFilter::OFF));
                (logger, level)
            })
            .collect();
        Self { saved }
    }

    pub fn loggers(&self) -> impl Iterator<Item = &LoggerName> {
        self.saved.iter().map(|(logger, _)| logger.name())
    }
}

impl Drop for MutedLoggers {
    fn drop(&mut self) {
        // Reverse order so a logger listed twice ends at its original level
        for (logger, level) in self.saved.drain(..).rev() {
            logger.set_level(level);
        }
    }
}

/// Run `f` with the named loggers turned off
///
/// ```
/// use logtap_testlib::with_logging_muted_in;
///
/// let total = with_logging_muted_in(["docs::noisy"], || {
///     tracing::error!(target: "docs::noisy", "never shown");
///     2 + 2
/// });
/// assert_eq!(total, 4);
/// ```
pub fn with_logging_muted_in<I, N, F, T>(names: I, f: F) -> T
where
    I: IntoIterator<Item = N>,
    N: Into<LoggerName>,
    F: FnOnce() -> T,
{
    let _muted = MutedLoggers::new(names);
    f()
}
