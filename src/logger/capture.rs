//! In-memory sink for asserting on emitted records.

use crate::logger::core::Sink;
use crate::logger::record::LogRecord;
use std::sync::{Arc, Mutex, PoisonError};

/// Records every `LogRecord` it receives.
///
/// Clones share the same buffer, so a test can install one clone and keep
/// another to inspect what was logged.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records captured so far, in arrival order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Sink for CaptureSink {
    fn log(&self, record: &LogRecord) -> String {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        String::new()
    }
}
