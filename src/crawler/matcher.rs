//! Query matching for rendered pages
//!
//! Two policies decide whether a page is recorded as a match:
//! - Link mode (default): every distinct extracted link containing the query
//!   is a match target.
//! - Full-page mode: the query occurring anywhere in the rendered page makes
//!   the query itself the single match target. If it does not occur, the
//!   page still goes through link mode, since resolved links can contain
//!   text the raw markup does not (e.g. a relative href).

use crate::crawler::parser::PageResult;
use crate::output::MatchRecord;
use std::collections::HashSet;

/// Decides which match records a page produces
///
/// # Arguments
///
/// * `page` - The rendered page and its extracted links
/// * `query` - Substring to search for
/// * `full_page` - Whether to search the whole rendered page first
///
/// # Returns
///
/// The records for this page, deduplicated by target, in first-seen order.
/// An empty vector is the ordinary "no match" outcome.
pub fn find_matches(page: &PageResult, query: &str, full_page: bool) -> Vec<MatchRecord> {
    if query.is_empty() {
        return Vec::new();
    }

    let source_url = page.source_url.as_str();

    if full_page && page.raw_page_text().contains(query) {
        return vec![MatchRecord::new(source_url, query)];
    }

    let mut seen = HashSet::new();
    page.extracted_links
        .iter()
        .map(|link| link.as_str())
        .filter(|link| link.contains(query))
        .filter(|link| seen.insert(*link))
        .map(|link| MatchRecord::new(source_url, link))
        .collect()
}
