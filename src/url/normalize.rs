use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a raw `href` against the page it was found on
///
/// # Resolution Steps
///
/// 1. Trim surrounding whitespace; reject empty hrefs
/// 2. Join against `base` (handles relative, root-relative, protocol-relative
///    and fragment-only hrefs)
/// 3. Keep only `http` and `https` results
/// 4. Require a host
/// 5. Drop the fragment, so `page#a` and `page#b` dedup to the same URL
///
/// # Arguments
///
/// * `base` - URL of the page the href was found on
/// * `raw_href` - The attribute value as written in the document
///
/// # Returns
///
/// * `Ok(Url)` - Absolute http(s) URL
/// * `Err(UrlError)` - The href cannot name a crawlable page
pub fn resolve_href(base: &Url, raw_href: &str) -> UrlResult<Url> {
    let href = raw_href.trim();
    if href.is_empty() {
        return Err(UrlError::Parse("empty href".to_string()));
    }

    let mut url = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Normalizes a discovered href into an absolute http(s) URL
///
/// Pure wrapper over [`resolve_href`] for callers that only care whether a
/// usable URL exists. `None` is the ordinary outcome for `mailto:`,
/// `javascript:`, `data:` and malformed hrefs.
///
/// # Examples
///
/// ```
/// use sherlock_crawler::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://a.net/blog/post").unwrap();
/// assert_eq!(normalize(&base, "../home").unwrap().as_str(), "https://a.net/home");
/// assert_eq!(normalize(&base, "//cdn.a.net/x.js").unwrap().as_str(), "https://cdn.a.net/x.js");
/// assert!(normalize(&base, "mailto:team@a.net").is_none());
/// ```
pub fn normalize(base: &Url, raw_href: &str) -> Option<Url> {
    resolve_href(base, raw_href).ok()
}
