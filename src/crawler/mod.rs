//! Crawler module for channel listing and video pages
//!
//! This module contains the core crawling logic, including:
//! - Session bootstrap from the listing page
//! - Walking embedded and paginated JSON payloads
//! - Continuation requests against the internal browse API
//! - The full-description pass over collected videos
//! - Overall crawl coordination

mod client;
mod coordinator;
mod embedded;
mod enricher;
mod fetcher;
mod progress;
mod session;
mod walker;

pub use client::{build_http_client, ClientProfile, PlatformClient};
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, Listing};
pub use embedded::{extract_assigned_json, INITIAL_DATA_VAR, PLAYER_RESPONSE_VAR};
pub use enricher::{
    enrich, extract_full_description, fetch_full_description, EnrichmentError, EnrichmentReport,
};
pub use fetcher::{
    body_excerpt, browse_request_body, fetch_next_page, BODY_EXCERPT_CHARS, CLIENT_NAME_HEADER,
    CLIENT_VERSION_HEADER,
};
pub use progress::{percent, LogReporter, ProgressEvent, ProgressReporter, RecordingReporter};
pub use session::{bootstrap, extract_session_keys, parse_listing_page, Session};
pub use walker::{
    collect_entities, find_continuation, find_continuation_with, parse_video_renderer, pick_text,
    walk, walk_payload, ContinuationStrategy, PayloadVisitor, WalkOutput, ENTITY_MARKERS,
};

use crate::config::Config;
use crate::SweepError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP session
/// 2. Load the listing page and extract the session keys
/// 3. Follow continuation tokens until the listing is exhausted or capped
/// 4. Fetch full descriptions if enabled
///
/// Writing the result to disk is left to the caller.
pub async fn crawl(config: Config) -> Result<CrawlOutcome, SweepError> {
    run_crawl(config).await
}
