//! SQLite-based output sink implementation
//!
//! This module provides an output sink that records crawl events directly
//! to the SQLite storage backend, under a run row created when the sink
//! opens.

use crate::output::traits::{MatchRecord, OutputResult, OutputSink, ScrapeRecord};
use crate::storage::{RunStatus, SqliteStorage, Storage};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// SQLite-based output sink
pub struct SqliteSink {
    storage: Mutex<SqliteStorage>,
    run_id: i64,
}

impl SqliteSink {
    /// Opens the database and starts a new run
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the effective configuration, stored on the run
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Database is open and the run row exists
    /// * `Err(OutputError)` - Database could not be opened or written
    pub fn open(path: &Path, config_hash: &str) -> OutputResult<Self> {
        Self::with_storage(SqliteStorage::new(path)?, config_hash)
    }

    /// Starts a new run on already opened storage
    pub fn with_storage(mut storage: SqliteStorage, config_hash: &str) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash)?;
        tracing::debug!("Recording to SQLite run {}", run_id);
        Ok(Self {
            storage: Mutex::new(storage),
            run_id,
        })
    }

    /// ID of the run this sink writes to
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Gives access to the underlying storage
    pub fn storage(&self) -> MutexGuard<'_, SqliteStorage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for SqliteSink {
    fn record_scrape(&self, record: &ScrapeRecord) -> OutputResult<()> {
        self.storage().insert_scrape(self.run_id, record)?;
        Ok(())
    }

    fn record_matches(&self, records: &[MatchRecord]) -> OutputResult<()> {
        self.storage().insert_matches(self.run_id, records)?;
        Ok(())
    }

    fn finish(&self, status: RunStatus) -> OutputResult<()> {
        self.storage().finish_run(self.run_id, status)?;
        Ok(())
    }
}
