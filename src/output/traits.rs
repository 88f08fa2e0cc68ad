//! Output sink traits and record types
//!
//! This module defines the two append-only logs a crawl produces and the
//! trait every sink implements.

use crate::storage::{RunStatus, StorageError};
use thiserror::Error;

/// Errors that can occur while writing output
///
/// Every variant is fatal to the run: once a record cannot be written, the
/// logs no longer reflect what was crawled.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One successfully rendered page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRecord {
    pub url: String,
    pub depth: u32,
}

impl ScrapeRecord {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// A page that satisfied the query, and what matched
///
/// `matched_target` is the query itself in full-page mode, or the matching
/// link in link mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchRecord {
    pub source_url: String,
    pub matched_target: String,
}

impl MatchRecord {
    pub fn new(source_url: impl Into<String>, matched_target: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            matched_target: matched_target.into(),
        }
    }
}

/// Destination for crawl records
///
/// Implementations are shared by all workers and must serialize their own
/// appends so records never interleave.
pub trait OutputSink: Send + Sync {
    /// Appends one entry to the scrape log
    fn record_scrape(&self, record: &ScrapeRecord) -> OutputResult<()>;

    /// Appends all match records of one page to the match log
    ///
    /// Called at most once per page, with a non-empty slice.
    fn record_matches(&self, records: &[MatchRecord]) -> OutputResult<()>;

    /// Flushes and closes out the run with its final status
    fn finish(&self, status: RunStatus) -> OutputResult<()>;
}
