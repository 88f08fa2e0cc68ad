use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sherlock_crawler::url::extract_domain;
///
/// let url = Url::parse("https://Shop.Example.NET/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("shop.example.net".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Converts a domain suffix to the ASCII form hosts are compared in
///
/// Parsed hosts are punycode (`сайт.укр` becomes `xn--80aswg.xn--j1amh`), so
/// a Unicode suffix is encoded label by label the same way. ASCII suffixes
/// are only lowercased. Returns `None` if the suffix is not a valid host
/// fragment.
///
/// # Examples
///
/// ```
/// use sherlock_crawler::url::ascii_suffix;
///
/// assert_eq!(ascii_suffix(".NET"), Some(".net".to_string()));
/// assert_eq!(ascii_suffix(".укр"), Some(".xn--j1amh".to_string()));
/// ```
pub fn ascii_suffix(suffix: &str) -> Option<String> {
    if suffix.is_ascii() {
        return Some(suffix.to_ascii_lowercase());
    }

    let (dot, labels) = match suffix.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", suffix),
    };
    let url = Url::parse(&format!("http://{}/", labels)).ok()?;
    url.host_str().map(|host| format!("{}{}", dot, host))
}

/// Checks whether a URL's host ends with the given suffix
///
/// The suffix is compared as plain text, the way a domain-zone filter such
/// as ".net" is meant: "shop.example.net" ends with ".net" and with
/// "example.net". An empty suffix admits every host. The suffix is expected
/// in the form [`ascii_suffix`] returns (see `CrawlConfig`).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sherlock_crawler::url::matches_domain_suffix;
///
/// let url = Url::parse("https://shop.example.net/x").unwrap();
/// assert!(matches_domain_suffix(&url, ".net"));
/// assert!(matches_domain_suffix(&url, ""));
/// assert!(!matches_domain_suffix(&url, ".com"));
/// ```
pub fn matches_domain_suffix(url: &Url, suffix: &str) -> bool {
    if suffix.is_empty() {
        return true;
    }

    match extract_domain(url) {
        Some(host) => host.ends_with(suffix),
        None => false,
    }
}
