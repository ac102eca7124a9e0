//! Handler that remembers the records it receives

use logtap_logging::{Handler, LevelFilter, LogRecord};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A log record retained by a [`CaptureHandler`]
pub type CapturedRecord = LogRecord;

/// Handler storing every accepted record for later inspection
pub struct CaptureHandler {
    level: LevelFilter,
    records: Mutex<Vec<CapturedRecord>>,
}

impl CaptureHandler {
    /// Create a handler accepting records at `level` and above
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of records captured so far
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The most recently captured record
    pub fn last(&self) -> Option<CapturedRecord> {
        self.lock().last().cloned()
    }

    pub fn get(&self, index: usize) -> Option<CapturedRecord> {
        self.lock().get(index).cloned()
    }

    /// All captured records in emission order
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Handler for CaptureHandler {
    fn publish(&self, record: &LogRecord) {
        self.lock().push(record.clone());
    }

    fn level(&self) -> LevelFilter {
        self.level
    }
}
