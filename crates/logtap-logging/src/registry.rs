//! Registry of named loggers
//!
//! Every logger has an optional level (unset means "inherit from the parent"),
//! a use-parent-handlers flag and a list of handlers. The registry is process
//! wide; tests that change a logger's configuration are expected to restore
//! it.
//!
//! # Dispatch
//!
//! A record for logger `L` is published only if its level is enabled by `L`'s
//! effective level. It then goes to every handler of `L` that accepts it and,
//! while the use-parent-handlers flag allows, to the handlers of each ancestor
//! up to the root. Ancestor levels are not consulted again.

use crate::handler::{ConsoleHandler, Handler};
use crate::record::LogRecord;
use logtap_core_types::schema::LIBRARY_LOGGER;
use logtap_core_types::LoggerName;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Level of the root logger until configured otherwise
pub const DEFAULT_ROOT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Configuration of a single logger
#[derive(Clone)]
struct LoggerState {
    level: Option<LevelFilter>,
    use_parent_handlers: bool,
    handlers: Vec<Arc<dyn Handler>>,
}

impl LoggerState {
    fn child() -> Self {
        Self {
            level: None,
            use_parent_handlers: true,
            handlers: Vec::new(),
        }
    }

    fn root() -> Self {
        Self {
            level: Some(DEFAULT_ROOT_LEVEL),
            use_parent_handlers: false,
            handlers: vec![Arc::new(ConsoleHandler::default())],
        }
    }

    /// Inherits the root level but never reaches root handlers
    fn library() -> Self {
        Self {
            level: None,
            use_parent_handlers: false,
            handlers: vec![Arc::new(ConsoleHandler::default())],
        }
    }

    fn initial(name: &LoggerName) -> Self {
        if name.is_root() {
            Self::root()
        } else if name.as_str() == LIBRARY_LOGGER {
            Self::library()
        } else {
            Self::child()
        }
    }
}

/// Process-wide logger configuration
pub struct LoggerRegistry {
    loggers: RwLock<HashMap<LoggerName, LoggerState>>,
}

static REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

impl LoggerRegistry {
    fn new() -> Self {
        let mut loggers = HashMap::new();
        loggers.insert(LoggerName::root(), LoggerState::root());
        loggers.insert(LoggerName::new(LIBRARY_LOGGER), LoggerState::library());
        Self {
            loggers: RwLock::new(loggers),
        }
    }

    /// The registry shared by the whole process
    pub fn global() -> &'static LoggerRegistry {
        REGISTRY.get_or_init(LoggerRegistry::new)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<LoggerName, LoggerState>> {
        self.loggers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<LoggerName, LoggerState>> {
        self.loggers.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the state of `name`, creating the logger on first use
    fn update<R>(&self, name: &LoggerName, f: impl FnOnce(&mut LoggerState) -> R) -> R {
        let mut loggers = self.write();
        let state = loggers
            .entry(name.clone())
            .or_insert_with(|| LoggerState::initial(name));
        f(state)
    }

    fn inspect<R>(&self, name: &LoggerName, f: impl FnOnce(&LoggerState) -> R) -> R {
        let loggers = self.read();
        match loggers.get(name) {
            Some(state) => f(state),
            None => f(&LoggerState::initial(name)),
        }
    }

    /// Explicitly set level of `name`, `None` if inherited
    pub fn level(&self, name: &LoggerName) -> Option<LevelFilter> {
        self.inspect(name, |s| s.level)
    }

    pub fn set_level(&self, name: &LoggerName, level: Option<LevelFilter>) {
        self.update(name, |s| s.level = level);
    }

    /// Level in force for `name`: its own, or the nearest ancestor's
    pub fn effective_level(&self, name: &LoggerName) -> LevelFilter {
        let loggers = self.read();
        name.ancestry()
            .iter()
            .find_map(|n| loggers.get(n).and_then(|s| s.level))
            .unwrap_or(DEFAULT_ROOT_LEVEL)
    }

    pub fn use_parent_handlers(&self, name: &LoggerName) -> bool {
        self.inspect(name, |s| s.use_parent_handlers)
    }

    pub fn set_use_parent_handlers(&self, name: &LoggerName, value: bool) {
        self.update(name, |s| s.use_parent_handlers = value);
    }

    pub fn handlers(&self, name: &LoggerName) -> Vec<Arc<dyn Handler>> {
        self.inspect(name, |s| s.handlers.clone())
    }

    pub fn add_handler(&self, name: &LoggerName, handler: Arc<dyn Handler>) {
        self.update(name, |s| s.handlers.push(handler));
    }

    /// Remove `handler` by identity, returning whether it was attached
    pub fn remove_handler(&self, name: &LoggerName, handler: &Arc<dyn Handler>) -> bool {
        self.update(name, |s| {
            let before = s.handlers.len();
            s.handlers.retain(|h| !Arc::ptr_eq(h, handler));
            s.handlers.len() != before
        })
    }

    /// Replace the handler list of `name`, returning the previous list
    pub fn set_handlers(
        &self,
        name: &LoggerName,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Vec<Arc<dyn Handler>> {
        self.update(name, |s| std::mem::replace(&mut s.handlers, handlers))
    }

    /// Whether a record of `level` emitted for `name` would be published
    pub fn is_loggable(&self, name: &LoggerName, level: Level) -> bool {
        level <= self.effective_level(name)
    }

    /// Handlers that receive records of `name`, nearest logger first
    fn dispatch_chain(&self, name: &LoggerName) -> Vec<Arc<dyn Handler>> {
        let loggers = self.read();
        let mut chain = Vec::new();
        for logger in name.ancestry() {
            let Some(state) = loggers.get(&logger) else {
                // Loggers never configured carry no handlers and propagate.
                continue;
            };
            chain.extend(state.handlers.iter().cloned());
            if !state.use_parent_handlers {
                break;
            }
        }
        chain
    }

    /// Publish `record` to the handlers responsible for its logger
    pub fn log(&self, record: &LogRecord) {
        if !self.is_loggable(record.logger(), record.level()) {
            return;
        }
        // Handlers run without the registry lock held.
        for handler in self.dispatch_chain(record.logger()) {
            if handler.is_loggable(record) {
                handler.publish(record);
            }
        }
    }
}

/// Handle to a named logger in the global registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Logger {
    name: LoggerName,
}

impl Logger {
    /// The logger with the given name
    pub fn get(name: impl Into<LoggerName>) -> Self {
        Self { name: name.into() }
    }

    pub fn root() -> Self {
        Self::get(LoggerName::root())
    }

    pub fn name(&self) -> &LoggerName {
        &self.name
    }

    fn registry(&self) -> &'static LoggerRegistry {
        LoggerRegistry::global()
    }

    pub fn level(&self) -> Option<LevelFilter> {
        self.registry().level(&self.name)
    }

    pub fn set_level(&self, level: Option<LevelFilter>) {
        self.registry().set_level(&self.name, level);
    }

    pub fn effective_level(&self) -> LevelFilter {
        self.registry().effective_level(&self.name)
    }

    pub fn use_parent_handlers(&self) -> bool {
        self.registry().use_parent_handlers(&self.name)
    }

    pub fn set_use_parent_handlers(&self, value: bool) {
        self.registry().set_use_parent_handlers(&self.name, value);
    }

    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.registry().handlers(&self.name)
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.registry().add_handler(&self.name, handler);
    }

    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        self.registry().remove_handler(&self.name, handler)
    }

    pub fn set_handlers(&self, handlers: Vec<Arc<dyn Handler>>) -> Vec<Arc<dyn Handler>> {
        self.registry().set_handlers(&self.name, handlers)
    }

    pub fn is_loggable(&self, level: Level) -> bool {
        self.registry().is_loggable(&self.name, level)
    }

    /// Publish a record built from `message` at `level`
    pub fn log(&self, level: Level, message: impl Into<String>) {
        self.log_record(&LogRecord::new(self.name.clone(), level, message));
    }

    /// Publish a prepared record as if it were emitted by this logger
    pub fn log_record(&self, record: &LogRecord) {
        self.registry().log(record);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }
}
