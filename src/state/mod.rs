//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the listing/pagination state machine
//! - `CrawlState`: session keys, continuation token, seen ids and collected summaries for one crawl

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use crawl_state::CrawlState;
