//! CSV and plain-text output sink
//!
//! Writes four files into the output directory:
//! - `scraped_urls.csv`: `URL,Deep Level` per rendered page
//! - `scraped_urls.txt`: one rendered URL per line
//! - `result.csv`: `Base URL,Search Query` per match record
//! - `result.txt`: one URL per page that produced at least one match
//!
//! Existing files are truncated when the sink is created, and every append
//! is flushed before returning.

use crate::output::traits::{MatchRecord, OutputResult, OutputSink, ScrapeRecord};
use crate::storage::RunStatus;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const SCRAPED_URLS_CSV: &str = "scraped_urls.csv";
pub const SCRAPED_URLS_TXT: &str = "scraped_urls.txt";
pub const RESULT_CSV: &str = "result.csv";
pub const RESULT_TXT: &str = "result.txt";

/// A CSV log and its plain-text companion
struct LogPair {
    csv: csv::Writer<File>,
    txt: BufWriter<File>,
}

impl LogPair {
    fn create(
        directory: &Path,
        csv_name: &str,
        txt_name: &str,
        header: [&str; 2],
    ) -> OutputResult<Self> {
        let mut csv = csv::Writer::from_writer(File::create(directory.join(csv_name))?);
        csv.write_record(header)?;
        csv.flush()?;

        let txt = BufWriter::new(File::create(directory.join(txt_name))?);

        Ok(Self { csv, txt })
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.csv.flush()?;
        self.txt.flush()?;
        Ok(())
    }
}

/// Output sink writing CSV and TXT logs
pub struct CsvSink {
    directory: PathBuf,
    scrape_log: Mutex<LogPair>,
    match_log: Mutex<LogPair>,
}

impl CsvSink {
    /// Creates the output directory and starts fresh logs in it
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - All four files exist and carry their headers
    /// * `Err(OutputError)` - The directory or a file could not be written
    pub fn create(directory: &Path) -> OutputResult<Self> {
        fs::create_dir_all(directory)?;

        let scrape_log = LogPair::create(
            directory,
            SCRAPED_URLS_CSV,
            SCRAPED_URLS_TXT,
            ["URL", "Deep Level"],
        )?;
        let match_log = LogPair::create(
            directory,
            RESULT_CSV,
            RESULT_TXT,
            ["Base URL", "Search Query"],
        )?;

        tracing::debug!("Writing CSV output to {}", directory.display());

        Ok(Self {
            directory: directory.to_path_buf(),
            scrape_log: Mutex::new(scrape_log),
            match_log: Mutex::new(match_log),
        })
    }

    fn lock(log: &Mutex<LogPair>) -> MutexGuard<'_, LogPair> {
        log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for CsvSink {
    fn record_scrape(&self, record: &ScrapeRecord) -> OutputResult<()> {
        let depth = record.depth.to_string();
        let mut log = Self::lock(&self.scrape_log);
        log.csv.write_record([record.url.as_str(), depth.as_str()])?;
        writeln!(log.txt, "{}", record.url)?;
        log.flush()
    }

    fn record_matches(&self, records: &[MatchRecord]) -> OutputResult<()> {
        let mut log = Self::lock(&self.match_log);
        let mut last_source: Option<&str> = None;
        for record in records {
            log.csv
                .write_record([record.source_url.as_str(), record.matched_target.as_str()])?;
            if last_source != Some(record.source_url.as_str()) {
                writeln!(log.txt, "{}", record.source_url)?;
                last_source = Some(record.source_url.as_str());
            }
        }
        log.flush()
    }

    fn finish(&self, status: RunStatus) -> OutputResult<()> {
        Self::lock(&self.scrape_log).flush()?;
        Self::lock(&self.match_log).flush()?;
        tracing::debug!(
            "CSV output in {} closed ({})",
            self.directory.display(),
            status.to_db_string()
        );
        Ok(())
    }
}
