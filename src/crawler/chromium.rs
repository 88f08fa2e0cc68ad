//! Headless Chromium render engine
//!
//! One browser process is launched for the whole crawl; each session owns its
//! own tab, so concurrent workers never navigate each other's pages.

use crate::crawler::render::{RenderEngine, RenderError, RenderResult, RenderSession, RenderedPage};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// Render engine backed by a headless Chromium instance
pub struct ChromiumRenderEngine {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
}

impl ChromiumRenderEngine {
    /// Launches a headless browser
    ///
    /// # Returns
    ///
    /// * `Ok(ChromiumRenderEngine)` - Browser is up and its event loop running
    /// * `Err(RenderError::Unavailable)` - No usable browser could be started
    pub async fn launch(user_agent: &str) -> RenderResult<Self> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--ignore-certificate-errors")
            .arg("--incognito")
            .arg(format!("--user-agent={}", user_agent))
            .build()
            .map_err(|e| RenderError::Unavailable(format!("Browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Unavailable(format!("Browser launch failed: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
        });

        tracing::info!("Launched headless Chromium");

        Ok(Self {
            browser: Mutex::new(browser),
            handler,
        })
    }
}

#[async_trait]
impl RenderEngine for ChromiumRenderEngine {
    fn name(&self) -> &'static str {
        "chromium"
    }

    async fn open_session(&self) -> RenderResult<Box<dyn RenderSession>> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Unavailable(format!("Failed to open tab: {}", e)))?;
        Ok(Box::new(ChromiumSession { page }))
    }

    async fn shutdown(&self) {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::warn!("Browser close error: {}", e);
        }
        self.handler.abort();
    }
}

/// Maps a CDP error onto the render error taxonomy
///
/// A dropped connection to the browser means every later render fails too.
fn classify_error(error: CdpError, timeout: Duration) -> RenderError {
    match error {
        CdpError::Ws(_) | CdpError::ChannelSendError(_) => {
            RenderError::Unavailable(format!("Browser connection lost: {}", error))
        }
        CdpError::Timeout => RenderError::Timeout(timeout),
        other => RenderError::Transport(other.to_string()),
    }
}

/// A browser tab owned by one worker
pub struct ChromiumSession {
    page: Page,
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn render(&mut self, url: &Url, timeout: Duration) -> RenderResult<RenderedPage> {
        let page = &self.page;
        let rendered = tokio::time::timeout(timeout, async move {
            page.goto(url.as_str()).await?;
            let html = page.content().await?;
            let final_url = page.url().await?;
            Ok::<_, CdpError>((html, final_url))
        })
        .await
        .map_err(|_| RenderError::Timeout(timeout))?
        .map_err(|e| classify_error(e, timeout))?;

        let (html, final_url) = rendered;
        let final_url = final_url
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        Ok(RenderedPage { final_url, html })
    }

    async fn close(&mut self) {
        if let Err(e) = self.page.clone().close().await {
            tracing::debug!("Tab close error: {}", e);
        }
    }
}
