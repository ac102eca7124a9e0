//! Bridge from `tracing` events to the logger registry

use crate::record::LogRecord;
use crate::registry::LoggerRegistry;
use logtap_core_types::LoggerName;
use tracing::subscriber::Interest;
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Layer that routes each event to the logger named by its target
pub struct LoggingLayer {
    registry: &'static LoggerRegistry,
}

impl LoggingLayer {
    pub fn new() -> Self {
        Self {
            registry: LoggerRegistry::global(),
        }
    }
}

impl Default for LoggingLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for LoggingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        // Logger levels change while the process runs, so interest can never
        // be cached per callsite.
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        if !metadata.is_event() {
            return true;
        }
        self.registry
            .is_loggable(&LoggerName::new(metadata.target()), *metadata.level())
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.registry.log(&LogRecord::from_event(event));
    }
}
