use crate::config::validation::validate;
use crate::url::ascii_suffix;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main configuration structure, as read from TOML and overlaid by CLI flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlSettings,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl and what to look for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlSettings {
    /// First URL to render (depth 0); required
    pub start_url: String,

    /// Host suffix links must end with; "any" or "*" disables the filter
    pub domain_suffix: String,

    /// Substring searched for in links or in the rendered page; required
    pub query: String,

    /// Cap on links enqueued from a single page (0 = unlimited)
    pub max_links_per_page: usize,

    /// Deepest level rendered, seed is depth 0 (0 = unlimited)
    pub max_depth: u32,

    /// Match the query against the whole rendered page instead of only links
    pub full_page_search: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            domain_suffix: "any".to_string(),
            query: String::new(),
            max_links_per_page: 10_000,
            max_depth: 1_000_000,
            full_page_search: false,
        }
    }
}

/// Which render engine backs the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderEngineKind {
    /// Plain HTTP GET, no script execution
    Http,
    /// Headless Chromium (requires the `chromium` feature)
    Chromium,
}

/// Render engine and worker pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    pub engine: RenderEngineKind,

    /// Per-page render timeout in seconds
    pub timeout_secs: u64,

    /// Number of concurrent workers, each with its own render session
    pub concurrency: usize,

    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: RenderEngineKind::Http,
            timeout_secs: 10,
            concurrency: 100,
            user_agent: concat!("sherlock-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Output sink selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV and plain-text logs in the output directory
    Csv,
    /// SQLite database
    Sqlite,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Directory receiving the CSV and TXT logs
    pub directory: String,

    /// Path to the SQLite database file
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Csv,
            directory: "results".to_string(),
            database_path: "results/crawl.db".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(&self.directory)
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}

/// Immutable crawl parameters handed to the controller
///
/// Built from a validated [`Config`]; the domain suffix is already lowercased
/// and the "any" wildcard is folded into an empty suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    pub start_url: Url,
    pub domain_suffix: String,
    pub query: String,
    pub max_links_per_page: usize,
    pub max_depth: u32,
    pub full_page_search: bool,
    pub concurrency: usize,
    pub render_timeout: Duration,
}

impl CrawlConfig {
    /// Validates `config` and derives the controller parameters from it
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        validate(config)?;

        let start_url = Url::parse(config.crawl.start_url.trim()).map_err(|e| {
            ConfigError::InvalidUrl(format!("'{}': {}", config.crawl.start_url, e))
        })?;

        Ok(Self {
            start_url,
            domain_suffix: effective_suffix(&config.crawl.domain_suffix),
            query: config.crawl.query.clone(),
            max_links_per_page: config.crawl.max_links_per_page,
            max_depth: config.crawl.max_depth,
            full_page_search: config.crawl.full_page_search,
            concurrency: config.render.concurrency,
            render_timeout: Duration::from_secs(config.render.timeout_secs),
        })
    }

    /// Builds a config with unlimited depth and links, one worker and
    /// no domain restriction
    pub fn new(start_url: Url, query: impl Into<String>) -> Self {
        Self {
            start_url,
            domain_suffix: String::new(),
            query: query.into(),
            max_links_per_page: 0,
            max_depth: 0,
            full_page_search: false,
            concurrency: 1,
            render_timeout: Duration::from_secs(10),
        }
    }
}

/// Folds the "any" / "*" wildcard into an empty suffix and converts the rest
/// to the lowercase ASCII form parsed hosts use
pub(crate) fn effective_suffix(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("any") || trimmed == "*" {
        return String::new();
    }
    ascii_suffix(trimmed).unwrap_or_else(|| trimmed.to_lowercase())
}
