//! Output module for crawl records
//!
//! This module handles:
//! - The scrape log and match log every crawl appends to
//! - CSV/TXT, SQLite and in-memory sinks
//! - Statistics over recorded runs

mod csv_output;
mod memory;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::{CsvSink, RESULT_CSV, RESULT_TXT, SCRAPED_URLS_CSV, SCRAPED_URLS_TXT};
pub use memory::MemorySink;
pub use sqlite_output::SqliteSink;
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use traits::{MatchRecord, OutputError, OutputResult, OutputSink, ScrapeRecord};

pub use crate::storage::RunStatus;

use crate::config::{OutputConfig, OutputFormat};
use std::sync::Arc;

/// Opens the sink selected by the output configuration
///
/// Any failure here happens before the first render.
///
/// # Arguments
///
/// * `config` - Output section of the configuration
/// * `config_hash` - Hash of the effective configuration (SQLite runs only)
pub fn open_sink(config: &OutputConfig, config_hash: &str) -> OutputResult<Arc<dyn OutputSink>> {
    let sink: Arc<dyn OutputSink> = match config.format {
        OutputFormat::Csv => Arc::new(CsvSink::create(&config.directory())?),
        OutputFormat::Sqlite => Arc::new(SqliteSink::open(&config.database_path(), config_hash)?),
    };
    Ok(sink)
}
