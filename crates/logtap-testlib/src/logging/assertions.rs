//! Assertions over the records captured by an interceptor

use crate::logging::handler::{CaptureHandler, CapturedRecord};
use crate::logging::subject::{AssertionFailure, Check, Fact, LogRecordSubject};
use std::sync::Arc;

/// View over the records accumulated by a [`CaptureHandler`]
///
/// Obtained from [`crate::Interceptor::assert_log`]. The view is live: records
/// published after it was obtained are visible through it.
#[derive(Clone)]
pub struct LoggingAssertions {
    handler: Arc<CaptureHandler>,
    check: Check,
}

impl LoggingAssertions {
    pub(crate) fn new(handler: Arc<CaptureHandler>) -> Self {
        Self {
            handler,
            check: Check::Panic,
        }
    }

    /// Send failures of this view and its subjects to `check`
    pub fn with_check(mut self, check: Check) -> Self {
        self.check = check;
        self
    }

    pub fn size(&self) -> usize {
        self.handler.count()
    }

    pub fn is_empty(&self) -> bool {
        self.handler.is_empty()
    }

    pub fn records(&self) -> Vec<CapturedRecord> {
        self.handler.records()
    }

    /// Messages of all records, one per line
    pub fn text_output(&self) -> String {
        self.handler
            .records()
            .iter()
            .map(|r| r.message().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Subject for the record at `index`
    pub fn record(&self, index: usize) -> LogRecordSubject {
        LogRecordSubject::new(self.check.clone(), self.handler.get(index))
    }

    pub fn first_record(&self) -> LogRecordSubject {
        self.record(0)
    }

    /// Subject for the most recent record
    pub fn last_record(&self) -> LogRecordSubject {
        LogRecordSubject::new(self.check.clone(), self.handler.last())
    }

    /// Check the number of captured records
    pub fn has_size(&self, expected: usize) {
        let actual = self.size();
        if actual != expected {
            self.check.fail(AssertionFailure::new(vec![
                Fact::new("expected size", expected.to_string()),
                Fact::new("but was", actual.to_string()),
                Fact::new("records", self.text_output()),
            ]));
        }
    }

    /// Check that nothing was captured
    pub fn is_empty_log(&self) {
        self.has_size(0);
    }

    /// Check that some record's message contains `part`
    pub fn contains_message(&self, part: &str) {
        let found = self
            .handler
            .records()
            .iter()
            .any(|r| r.message().contains(part));
        if !found {
            self.check.fail(AssertionFailure::new(vec![
                Fact::new("expected a record containing", format!("{:?}", part)),
                Fact::new("records", self.text_output()),
            ]));
        }
    }

    /// Discard the captured records
    pub fn clear(&self) {
        self.handler.clear();
    }
}
