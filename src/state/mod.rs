//! State module for tracking crawl progress
//!
//! - `CrawlPhase`: the controller lifecycle (`Idle → Running → Draining → Done`)

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
