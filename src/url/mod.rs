//! URL handling module for Sherlock
//!
//! This module turns raw hrefs into absolute http(s) URLs and decides
//! whether a URL's host falls inside the configured domain suffix.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{ascii_suffix, extract_domain, matches_domain_suffix};
pub use normalize::{normalize, resolve_href};
