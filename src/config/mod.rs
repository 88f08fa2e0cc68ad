//! Configuration module for Sherlock
//!
//! Settings come from an optional TOML file, are overlaid by command-line
//! flags in the binary, validated, and finally turned into an immutable
//! [`CrawlConfig`] for the controller.
//!
//! # Example
//!
//! ```no_run
//! use sherlock_crawler::config::{load_config, CrawlConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! let crawl = CrawlConfig::from_config(&config).unwrap();
//! println!("Crawler will use max depth: {}", crawl.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, CrawlSettings, OutputConfig, OutputFormat, RenderConfig,
    RenderEngineKind,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::validate;
