//! Link extractor for rendered pages
//!
//! This module pulls candidate links out of a rendered DOM and resolves them
//! against the page URL. Candidates are gathered from these sources, in this
//! fixed order (the order matters when a per-page link cap truncates the list):
//!
//! 1. `<a href>`
//! 2. `<link rel="stylesheet" href>`
//! 3. `<script src>`
//! 4. `<link rel="alternate" hreflang="en" href>`
//! 5. `<meta property="og:url" content>` (first one only)

use crate::url::normalize;
use scraper::{Html, Selector};
use url::Url;

/// Selector and attribute for each multi-valued link source, in output order
const LINK_SOURCES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    (r#"link[rel~="stylesheet"][href]"#, "href"),
    ("script[src]", "src"),
    (r#"link[rel~="alternate"][hreflang="en"][href]"#, "href"),
];

const OG_URL_SOURCE: (&str, &str) = (r#"meta[property="og:url"][content]"#, "content");

/// A rendered page together with the links found on it
#[derive(Debug, Clone)]
pub struct PageResult {
    /// The URL that was dispatched to the render engine
    pub source_url: Url,

    /// The full rendered markup
    pub rendered_html: String,

    /// Absolute http(s) links in source order, duplicates included
    pub extracted_links: Vec<Url>,
}

impl PageResult {
    /// Runs link extraction over a freshly rendered page
    ///
    /// # Arguments
    ///
    /// * `source_url` - URL recorded for this page
    /// * `document_url` - URL the document was loaded from (after redirects),
    ///   used to resolve relative links
    /// * `rendered_html` - The rendered DOM serialized as HTML
    pub fn from_render(source_url: Url, document_url: &Url, rendered_html: String) -> Self {
        let extracted_links = extract_links(&rendered_html, document_url);
        Self {
            source_url,
            rendered_html,
            extracted_links,
        }
    }

    /// Text used for full-page query matching
    ///
    /// This is the rendered markup itself, so a query like "analytics.js"
    /// also matches inline script contents and attribute values.
    pub fn raw_page_text(&self) -> &str {
        &self.rendered_html
    }
}

/// Extracts every candidate link from a rendered document
///
/// Hrefs that do not resolve to an absolute http(s) URL are dropped.
/// Duplicates are kept; deduplication is the frontier's job.
///
/// # Example
///
/// ```
/// use sherlock_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><script src="/app.js"></script><a href="mailto:x@a.net">x</a>"#;
/// let base = Url::parse("https://a.net/").unwrap();
/// let links: Vec<String> = extract_links(html, &base).iter().map(|u| u.to_string()).collect();
/// assert_eq!(links, vec!["https://a.net/a", "https://a.net/app.js"]);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for (selector, attr) in LINK_SOURCES {
        links.extend(
            select_attr(&document, selector, attr)
                .into_iter()
                .filter_map(|href| normalize(page_url, &href)),
        );
    }

    let (selector, attr) = OG_URL_SOURCE;
    if let Some(og_url) = select_attr(&document, selector, attr)
        .into_iter()
        .next()
        .and_then(|content| normalize(page_url, &content))
    {
        links.push(og_url);
    }

    links
}

/// Collects `attr` from every element matching `selector`, in document order
fn select_attr(document: &Html, selector: &str, attr: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        tracing::error!("Invalid link selector: {}", selector);
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::to_owned)
        .collect()
}
