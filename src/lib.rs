//! Sherlock: a depth-bounded, domain-filtered query crawler
//!
//! This crate walks a site breadth-first from a start URL, renders each page
//! through a pluggable render engine, follows links that stay inside a domain
//! suffix, and records which pages (or which of their links) contain a search
//! query.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl runs
///
/// Only errors that terminate a run end up here. Per-page failures
/// (render timeouts, unresolvable links) are logged and counted instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render engine failed: {0}")]
    Render(#[from] crawler::RenderError),

    #[error("Render engine unavailable at startup: {0}")]
    RenderUnavailable(String),

    #[error("Output sink error: {0}")]
    Sink(#[from] output::OutputError),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Crawl worker panicked: {0}")]
    WorkerPanicked(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig};
pub use crawler::{Crawler, CrawlReport, FrontierItem};
pub use output::{MatchRecord, OutputSink, ScrapeRecord};
pub use state::CrawlPhase;
pub use self::url::{matches_domain_suffix, normalize};
