//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::output::{MatchRecord, ScrapeRecord};
use crate::storage::{RunRecord, RunStatus};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage: Send {
    // ===== Run Management =====

    /// Creates a new crawl run in the `running` state
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the effective configuration
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Sets the final status of a run and stamps its finish time
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Logs =====

    /// Appends one entry to the scrape log of a run
    fn insert_scrape(&mut self, run_id: i64, record: &ScrapeRecord) -> StorageResult<()>;

    /// Appends a page's match records to the match log of a run
    ///
    /// All records are written in one transaction. Duplicate
    /// (source, target) pairs within a run are ignored.
    fn insert_matches(&mut self, run_id: i64, records: &[MatchRecord]) -> StorageResult<()>;

    // ===== Statistics =====

    /// Counts scraped pages of a run
    fn count_scraped(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts match records of a run
    fn count_matches(&self, run_id: i64) -> StorageResult<u64>;

    /// Counts distinct pages of a run that produced at least one match
    fn count_matching_pages(&self, run_id: i64) -> StorageResult<u64>;

    /// Gets scraped page counts per depth
    fn depth_breakdown(&self, run_id: i64) -> StorageResult<BTreeMap<u32, u64>>;
}
