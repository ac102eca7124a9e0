//! Redirection of a logger's output into memory

use crate::errors::{Result, TestLibError};
use logtap_core_types::schema::LIBRARY_LOGGER;
use logtap_logging::{init, Handler, Logger, LoggerName, MemoizingStream, Profile, StreamHandler};
use std::io::Write;
use std::sync::Arc;

/// Configuration replaced by an installed tap
struct Saved {
    handlers: Vec<Arc<dyn Handler>>,
    use_parent_handlers: bool,
}

/// Mutes a logger by sending its output into an in-memory stream
///
/// Between [`MutingLoggerTap::install`] and [`MutingLoggerTap::remove`] the
/// logger's handlers are replaced by one handler writing to the tap's stream,
/// and its records stop propagating to parent handlers. Nothing reaches the
/// console; the accumulated output can be inspected or flushed elsewhere.
pub struct MutingLoggerTap {
    logger: Logger,
    stream: MemoizingStream,
    saved: Option<Saved>,
}

impl MutingLoggerTap {
    pub fn new(logger: impl Into<LoggerName>) -> Self {
        init(Profile::Test);
        Self {
            logger: Logger::get(logger),
            stream: MemoizingStream::new(),
            saved: None,
        }
    }

    /// Tap on the root logger, muting every logger that propagates to it
    pub fn root() -> Self {
        Self::new(LoggerName::root())
    }

    pub fn logger_name(&self) -> &LoggerName {
        self.logger.name()
    }

    /// The stream receiving the muted output
    pub fn stream(&self) -> &MemoizingStream {
        &self.stream
    }

    pub fn is_installed(&self) -> bool {
        self.saved.is_some()
    }

    /// Start muting, discarding output accumulated by a previous session
    ///
    /// # Errors
    ///
    /// Returns [`TestLibError::AlreadyInstalled`] if the tap is installed.
    pub fn install(&mut self) -> Result<()> {
        if self.saved.is_some() {
            return Err(TestLibError::AlreadyInstalled {
                logger: self.logger.name().clone(),
            });
        }
        self.stream.reset();

        let handler: Arc<dyn Handler> = Arc::new(StreamHandler::new(self.stream.clone()));
        let use_parent_handlers = self.logger.use_parent_handlers();
        let handlers = self.logger.set_handlers(vec![handler]);
        self.logger.set_use_parent_handlers(false);
        self.saved = Some(Saved {
            handlers,
            use_parent_handlers,
        });
        Ok(())
    }

    /// Stop muting and put the replaced handlers back
    ///
    /// The accumulated output stays available until the next install.
    /// Does nothing if the tap is not installed.
    pub fn remove(&mut self) {
        let Some(saved) = self.saved.take() else {
            return;
        };
        self.logger.set_handlers(saved.handlers);
        self.logger.set_use_parent_handlers(saved.use_parent_handlers);

        tracing::debug!(
            target: LIBRARY_LOGGER,
            logger = %self.logger.name(),
            muted_bytes = self.stream.size(),
            "removed muting tap"
        );
    }

    /// Number of bytes accumulated since the last install
    pub fn stream_size(&self) -> usize {
        self.stream.size()
    }

    /// The accumulated output as text
    pub fn output(&self) -> String {
        self.stream.to_string_lossy()
    }

    /// Write the accumulated output to `sink`, keeping it in the tap
    ///
    /// # Errors
    ///
    /// Returns [`TestLibError::Io`] if writing to or flushing `sink` fails.
    pub fn flush_to<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
        self.stream
            .flush_to(sink)
            .map_err(|err| TestLibError::io("flush_to", err))
    }
}

impl Drop for MutingLoggerTap {
    fn drop(&mut self) {
        self.remove();
    }
}
