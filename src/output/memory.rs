//! In-memory output sink
//!
//! Keeps both logs in vectors. Useful when embedding the crawler as a library
//! and for tests.

use crate::output::traits::{MatchRecord, OutputResult, OutputSink, ScrapeRecord};
use crate::storage::RunStatus;
use std::sync::{Mutex, PoisonError};

/// Output sink that keeps records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    scrapes: Mutex<Vec<ScrapeRecord>>,
    matches: Mutex<Vec<MatchRecord>>,
    status: Mutex<Option<RunStatus>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the scrape log
    pub fn scrapes(&self) -> Vec<ScrapeRecord> {
        self.scrapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the match log
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Final run status, once `finish` was called
    pub fn status(&self) -> Option<RunStatus> {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for MemorySink {
    fn record_scrape(&self, record: &ScrapeRecord) -> OutputResult<()> {
        self.scrapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    fn record_matches(&self, records: &[MatchRecord]) -> OutputResult<()> {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(records);
        Ok(())
    }

    fn finish(&self, status: RunStatus) -> OutputResult<()> {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
        Ok(())
    }
}
