//! Render engine interface and the HTTP render engine
//!
//! The crawler never fetches pages itself. It asks a render engine for the
//! final DOM of a URL, through one session per worker so that workers never
//! share navigation state. This module defines that interface and provides
//! an engine that renders with a plain HTTP GET:
//! - Building an HTTP client per session with the configured user agent
//! - Bounding each request by the render timeout
//! - Skipping responses that are not HTML documents
//! - Classifying failures into timeouts and transport errors

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors a render engine can report
#[derive(Debug, Error)]
pub enum RenderError {
    /// The page did not finish rendering in time (skip the page)
    #[error("Render timed out after {0:?}")]
    Timeout(Duration),

    /// Name resolution, connection, TLS or HTTP failure (skip the page)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The engine itself is gone (terminates the crawl)
    #[error("Render engine unavailable: {0}")]
    Unavailable(String),
}

impl RenderError {
    /// Returns true if the error means no further page can be rendered
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// A fully rendered document
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// URL the document ended up at (after redirects)
    pub final_url: Url,

    /// The rendered DOM serialized as HTML
    pub html: String,
}

/// A render engine that hands out independent rendering sessions
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Opens a session owned by a single worker
    ///
    /// Failing here at startup means the engine is unreachable.
    async fn open_session(&self) -> RenderResult<Box<dyn RenderSession>>;

    /// Releases engine-wide resources once every session is closed
    async fn shutdown(&self) {}
}

/// A single worker's rendering session
#[async_trait]
pub trait RenderSession: Send {
    /// Renders `url`, giving up after `timeout`
    async fn render(&mut self, url: &Url, timeout: Duration) -> RenderResult<RenderedPage>;

    /// Releases the session's resources
    async fn close(&mut self) {}
}

/// Renders pages with an HTTP GET and returns the response body as-is
///
/// No JavaScript runs, so this suits server-rendered sites and tests. Use
/// the Chromium engine for script-driven pages.
#[derive(Debug, Clone)]
pub struct HttpRenderEngine {
    user_agent: String,
}

impl HttpRenderEngine {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

/// Builds an HTTP client for one render session
///
/// # Example
///
/// ```no_run
/// use sherlock_crawler::crawler::build_http_client;
///
/// let client = build_http_client("sherlock-crawler/0.1").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

#[async_trait]
impl RenderEngine for HttpRenderEngine {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn open_session(&self) -> RenderResult<Box<dyn RenderSession>> {
        let client = build_http_client(&self.user_agent)
            .map_err(|e| RenderError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Box::new(HttpRenderSession { client }))
    }
}

/// Session of the HTTP render engine
pub struct HttpRenderSession {
    client: Client,
}

#[async_trait]
impl RenderSession for HttpRenderSession {
    async fn render(&mut self, url: &Url, timeout: Duration) -> RenderResult<RenderedPage> {
        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Transport(format!("HTTP {}", status.as_u16())));
        }
        check_document(&response)?;

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        Ok(RenderedPage { final_url, html })
    }
}

/// Largest response body rendered, by its declared length
const MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Rejects responses that are not an HTML document of reasonable size
///
/// A missing Content-Type is accepted; servers often omit it for HTML.
fn check_document(response: &Response) -> RenderResult<()> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !content_type.is_empty() && !is_html(content_type) {
        return Err(RenderError::Transport(format!(
            "Not an HTML document ({})",
            content_type
        )));
    }

    match response.content_length() {
        Some(length) if length > MAX_BODY_BYTES => Err(RenderError::Transport(format!(
            "Body too large ({} bytes)",
            length
        ))),
        _ => Ok(()),
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Maps a reqwest error onto the render error taxonomy
fn classify_error(error: reqwest::Error, timeout: Duration) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout(timeout)
    } else if error.is_connect() {
        RenderError::Transport(format!("Connection failed: {}", error))
    } else {
        RenderError::Transport(error.to_string())
    }
}
