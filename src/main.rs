//! Sherlock main entry point
//!
//! This is the command-line interface for the Sherlock query crawler.

use anyhow::Context;
use clap::Parser;
use sherlock_crawler::config::{
    compute_config_hash, read_config, validate, Config, OutputFormat, RenderEngineKind,
};
use sherlock_crawler::crawler::run_crawl;
use sherlock_crawler::output::{load_statistics, print_statistics, RunStatus};
use sherlock_crawler::storage::SqliteStorage;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Exit code of a run stopped by Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

/// Sherlock: a depth-bounded, domain-filtered query crawler
///
/// Sherlock walks a site breadth-first from a start URL, follows links that
/// stay inside a domain zone, and records which pages link to (or contain)
/// a search query.
#[derive(Parser, Debug)]
#[command(name = "sherlock-crawler")]
#[command(version)]
#[command(about = "A depth-bounded, domain-filtered query crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (flags below override it)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL the crawl starts from
    #[arg(short = 'u', long = "start-point", value_name = "URL")]
    start_point: Option<String>,

    /// Only follow links whose host ends with this suffix ("any" = all)
    #[arg(short = 'd', long = "domain-zone", value_name = "SUFFIX")]
    domain_zone: Option<String>,

    /// Substring to search for in links (or whole pages with --full-search)
    #[arg(short = 'q', long)]
    query: Option<String>,

    /// Maximum new links taken from each page (0 = unlimited)
    #[arg(long = "links-per-url", value_name = "N")]
    links_per_url: Option<usize>,

    /// Maximum link depth from the start URL (0 = unlimited)
    #[arg(long = "scraping-deep-level", value_name = "N")]
    scraping_deep_level: Option<u32>,

    /// Number of pages rendered in parallel
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Match the query against the whole rendered page instead of its links
    /// (`--full-search=false` turns it off again)
    #[arg(
        long = "full-search",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    full_search: Option<bool>,

    /// Render engine to use
    #[arg(long, value_enum)]
    engine: Option<RenderEngineKind>,

    /// Render timeout per page, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory for CSV/TXT output
    #[arg(long = "output-dir", value_name = "DIR")]
    output_dir: Option<String>,

    /// SQLite database for --format sqlite and --stats
    #[arg(long, value_name = "PATH")]
    database: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the latest run in the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

impl Cli {
    /// Overlays command-line flags onto the file (or default) configuration
    fn apply(&self, config: &mut Config) {
        if let Some(start_point) = &self.start_point {
            config.crawl.start_url = start_point.clone();
        }
        if let Some(domain_zone) = &self.domain_zone {
            config.crawl.domain_suffix = domain_zone.clone();
        }
        if let Some(query) = &self.query {
            config.crawl.query = query.clone();
        }
        if let Some(links) = self.links_per_url {
            config.crawl.max_links_per_page = links;
        }
        if let Some(depth) = self.scraping_deep_level {
            config.crawl.max_depth = depth;
        }
        if let Some(full_search) = self.full_search {
            config.crawl.full_page_search = full_search;
        }
        if let Some(concurrency) = self.concurrency {
            config.render.concurrency = concurrency;
        }
        if let Some(engine) = self.engine {
            config.render.engine = engine;
        }
        if let Some(timeout) = self.timeout {
            config.render.timeout_secs = timeout;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(database) = &self.database {
            config.output.database_path = database.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply(&mut config);

    if cli.stats {
        handle_stats(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(ExitCode::SUCCESS);
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sherlock_crawler=info,warn"),
            1 => EnvFilter::new("sherlock_crawler=debug,info"),
            2 => EnvFilter::new("sherlock_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let hash = compute_config_hash(config)?;
    let crawl = &config.crawl;

    println!("=== Sherlock Dry Run ===\n");

    println!("Crawl:");
    println!("  Start URL: {}", crawl.start_url);
    println!("  Domain zone: {}", crawl.domain_suffix);
    println!("  Query: {}", crawl.query);
    println!("  Max links per page: {}", limit(crawl.max_links_per_page as u64));
    println!("  Max depth: {}", limit(u64::from(crawl.max_depth)));
    println!(
        "  Match mode: {}",
        if crawl.full_page_search { "full page" } else { "links" }
    );

    println!("\nRender:");
    println!("  Engine: {:?}", config.render.engine);
    println!("  Concurrency: {}", config.render.concurrency);
    println!("  Timeout: {}s", config.render.timeout_secs);
    println!("  User agent: {}", config.render.user_agent);

    println!("\nOutput:");
    match config.output.format {
        OutputFormat::Csv => println!("  CSV directory: {}", config.output.directory),
        OutputFormat::Sqlite => println!("  SQLite database: {}", config.output.database_path),
    }

    println!("\n✓ Configuration is valid (hash: {})", hash);

    Ok(())
}

fn limit(value: u64) -> String {
    if value == 0 {
        "unlimited".to_string()
    } else {
        value.to_string()
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = config.output.database_path();
    anyhow::ensure!(path.exists(), "No database at {}", path.display());

    println!("Database: {}\n", path.display());

    let storage = SqliteStorage::new(&path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    match load_statistics(&storage)? {
        Some(stats) => print_statistics(&stats),
        None => println!("No crawl runs recorded yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<ExitCode> {
    let cancel = CancellationToken::new();

    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight pages");
            signal.cancel();
        }
    });

    let report = run_crawl(config, cancel).await.context("Crawl failed")?;

    println!(
        "Scraped {} pages ({} render failures), {} match records, {} URLs seen in {:.1}s",
        report.pages_scraped,
        report.render_failures,
        report.match_records,
        report.urls_seen,
        report.elapsed.as_secs_f64()
    );

    if report.status == RunStatus::Interrupted {
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    Ok(ExitCode::SUCCESS)
}
