//! Statistics generation from the crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::storage::{RunRecord, Storage, StorageResult};
use std::collections::BTreeMap;

/// Crawl statistics summary for one run
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// The run the numbers belong to
    pub run: RunRecord,

    /// Number of pages rendered and logged
    pub pages_scraped: u64,

    /// Number of match records
    pub match_records: u64,

    /// Number of distinct pages with at least one match
    pub matching_pages: u64,

    /// Scraped page count per depth
    pub depth_breakdown: BTreeMap<u32, u64>,
}

/// Loads statistics of the most recent run
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(Some(CrawlStatistics))` - Statistics of the latest run
/// * `Ok(None)` - The database holds no runs yet
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn Storage) -> StorageResult<Option<CrawlStatistics>> {
    let Some(run) = storage.get_latest_run()? else {
        return Ok(None);
    };

    Ok(Some(CrawlStatistics {
        pages_scraped: storage.count_scraped(run.id)?,
        match_records: storage.count_matches(run.id)?,
        matching_pages: storage.count_matching_pages(run.id)?,
        depth_breakdown: storage.depth_breakdown(run.id)?,
        run,
    }))
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Run:");
    println!("  ID: {}", stats.run.id);
    println!("  Status: {}", stats.run.status);
    println!("  Started: {}", stats.run.started_at);
    if let Some(finished) = &stats.run.finished_at {
        println!("  Finished: {}", finished);
    }
    println!("  Config hash: {}", stats.run.config_hash);
    println!();

    println!("Overview:");
    println!("  Pages scraped: {}", stats.pages_scraped);
    println!("  Match records: {}", stats.match_records);
    println!("  Matching pages: {}", stats.matching_pages);
    println!();

    if !stats.depth_breakdown.is_empty() {
        println!("Pages by Depth:");
        for (depth, count) in &stats.depth_breakdown {
            let percentage = if stats.pages_scraped > 0 {
                (*count as f64 / stats.pages_scraped as f64) * 100.0
            } else {
                0.0
            };
            println!("  {}: {} ({:.1}%)", depth, count, percentage);
        }
        println!();
    }

    let hit_rate = if stats.pages_scraped > 0 {
        (stats.matching_pages as f64 / stats.pages_scraped as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Hit Rate: {:.1}% ({} / {} pages matched the query)",
        hit_rate, stats.matching_pages, stats.pages_scraped
    );
}
