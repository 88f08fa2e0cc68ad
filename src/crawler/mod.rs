//! Crawler module for rendering and processing pages
//!
//! This module contains the core crawling logic, including:
//! - The frontier with its seen set and depth limit
//! - Link extraction from rendered HTML
//! - Query matching per page
//! - Render engines (HTTP, and headless Chromium behind the `chromium` feature)
//! - Overall crawl coordination

#[cfg(feature = "chromium")]
mod chromium;
mod coordinator;
mod frontier;
mod matcher;
mod parser;
mod render;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderEngine;
pub use coordinator::{CrawlReport, Crawler};
pub use frontier::{Claim, Frontier, FrontierItem};
pub use matcher::find_matches;
pub use parser::{extract_links, PageResult};
pub use render::{
    build_http_client, HttpRenderEngine, RenderEngine, RenderError, RenderResult, RenderSession,
    RenderedPage,
};

use crate::config::{compute_config_hash, Config, CrawlConfig, RenderConfig, RenderEngineKind};
use crate::output::{open_sink, RunStatus};
use crate::{CrawlError, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builds the render engine selected by the configuration
///
/// # Returns
///
/// * `Ok(engine)` - Engine is ready to open sessions
/// * `Err(CrawlError::RenderUnavailable)` - The engine could not be started
pub async fn build_engine(config: &RenderConfig) -> Result<Arc<dyn RenderEngine>> {
    match config.engine {
        RenderEngineKind::Http => Ok(Arc::new(HttpRenderEngine::new(config.user_agent.as_str()))),
        #[cfg(feature = "chromium")]
        RenderEngineKind::Chromium => {
            let engine = ChromiumRenderEngine::launch(&config.user_agent)
                .await
                .map_err(|e| CrawlError::RenderUnavailable(e.to_string()))?;
            Ok(Arc::new(engine))
        }
        #[cfg(not(feature = "chromium"))]
        RenderEngineKind::Chromium => Err(CrawlError::RenderUnavailable(
            "this build does not include the chromium render engine (enable the `chromium` feature)"
                .to_string(),
        )),
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Open the output sink (before any page is rendered)
/// 3. Start the render engine
/// 4. Crawl until the frontier drains or `cancel` fires
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `cancel` - Stop signal; in-flight pages finish, nothing new is rendered
///
/// # Example
///
/// ```no_run
/// use sherlock_crawler::config::load_config;
/// use sherlock_crawler::crawler::run_crawl;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let report = run_crawl(&config, CancellationToken::new()).await?;
/// println!("{} pages scraped", report.pages_scraped);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, cancel: CancellationToken) -> Result<CrawlReport> {
    let crawl = CrawlConfig::from_config(config)?;
    let config_hash = compute_config_hash(config)?;

    let sink = open_sink(&config.output, &config_hash)?;
    let engine = match build_engine(&config.render).await {
        Ok(engine) => engine,
        Err(e) => {
            if let Err(finish) = sink.finish(RunStatus::Failed) {
                tracing::warn!("Failed to close output sink: {}", finish);
            }
            return Err(e);
        }
    };

    Crawler::new(crawl, engine, sink)
        .with_cancellation(cancel)
        .run()
        .await
}
