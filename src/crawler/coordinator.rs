//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl through its phases:
//! - Bootstrapping the session from the listing page
//! - Walking the first payload and every continuation page
//! - Deduplicating videos and enforcing the cap
//! - Running the optional full-description pass
//!
//! Pagination is strictly sequential: every request needs the token from
//! the previous response.

use crate::config::Config;
use crate::crawler::client::PlatformClient;
use crate::crawler::enricher::{enrich, EnrichmentReport};
use crate::crawler::fetcher::fetch_next_page;
use crate::crawler::progress::{LogReporter, ProgressEvent, ProgressReporter};
use crate::crawler::session::bootstrap;
use crate::crawler::walker::walk;
use crate::entity::EntitySummary;
use crate::output::CrawlResult;
use crate::state::{CrawlPhase, CrawlState};
use crate::SweepError;
use std::sync::Arc;

/// Videos collected from the listing, before the description pass
#[derive(Debug, Clone)]
pub struct Listing {
    /// Resolved videos-tab URL
    pub listing_url: String,

    /// Listing pages walked, including the embedded first page
    pub pages: usize,

    /// Deduplicated videos in discovery order, truncated to the cap
    pub entities: Vec<EntitySummary>,
}

/// A finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub result: CrawlResult,

    /// Present when the description pass ran
    pub enrichment: Option<EnrichmentReport>,
}

impl CrawlOutcome {
    /// True if some videos kept a possibly truncated listing snippet
    pub fn descriptions_incomplete(&self) -> bool {
        self.enrichment
            .as_ref()
            .map(EnrichmentReport::has_failures)
            .unwrap_or(false)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: PlatformClient,
    reporter: Arc<dyn ProgressReporter>,
}

impl Coordinator {
    /// Creates a new coordinator with its own HTTP session
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SweepError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, SweepError> {
        let client = PlatformClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a coordinator around a caller-built client
    pub fn with_client(config: Config, client: PlatformClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
            reporter: Arc::new(LogReporter),
        }
    }

    /// Replaces the default tracing-based progress reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs the whole crawl: listing, pagination, then descriptions if enabled
    pub async fn run(&self) -> Result<CrawlOutcome, SweepError> {
        let start_time = std::time::Instant::now();
        let listing = self.collect().await?;

        let crawler = &self.config.crawler;
        let wants_descriptions = crawler.fetch_full_description && !listing.entities.is_empty();
        let (entities, enrichment) = if wants_descriptions {
            let (entities, report) = enrich(
                &self.client,
                listing.entities,
                crawler.enrich_concurrency,
                self.reporter.as_ref(),
            )
            .await;
            (entities, Some(report))
        } else {
            (listing.entities, None)
        };

        let result = CrawlResult::new(&self.config.channel.root, listing.listing_url, entities);

        tracing::info!(
            "Crawl completed: {} videos from {} pages in {:?}",
            result.total_count(),
            listing.pages,
            start_time.elapsed()
        );

        Ok(CrawlOutcome { result, enrichment })
    }

    /// Collects the deduplicated video list without the description pass
    pub async fn collect(&self) -> Result<Listing, SweepError> {
        let mut state = CrawlState::new(self.config.crawler.max_videos);

        match self.paginate(&mut state).await {
            Ok(listing_url) => Ok(Listing {
                listing_url,
                pages: state.pages(),
                entities: state.into_entities(),
            }),
            Err(e) => {
                let failed_in = state.abort();
                tracing::debug!("Crawl aborted in phase {}: {}", failed_in, e);
                Err(e)
            }
        }
    }

    /// Drives `state` from `Init` to `Done`, returning the listing URL
    async fn paginate(&self, state: &mut CrawlState) -> Result<String, SweepError> {
        let platform_root = self.client.profile().platform_root.clone();

        let session = bootstrap(&self.client, &self.config.channel.root).await?;
        state.session_api_key = session.api_key;
        state.client_version = session.client_version;
        state.transition(CrawlPhase::ListingLoaded)?;

        let first = walk(&session.first_payload, &platform_root);
        self.merge(state, first.entities);
        self.advance(state, first.continuation)?;

        while state.phase() == CrawlPhase::Paginating {
            let Some(token) = state.consume_token() else {
                state.transition(CrawlPhase::Done)?;
                break;
            };

            let payload = fetch_next_page(
                &self.client,
                &state.session_api_key,
                &state.client_version,
                &token,
                &session.listing_url,
            )
            .await?;

            let page = walk(&payload, &platform_root);
            self.merge(state, page.entities);
            self.advance(state, page.continuation)?;
        }

        Ok(session.listing_url)
    }

    fn merge(&self, state: &mut CrawlState, entities: Vec<EntitySummary>) {
        let found = entities.len();
        let added = state.merge_page(entities);
        tracing::debug!(
            "Page {}: {} renderers, {} new videos",
            state.pages(),
            found,
            added
        );
        self.reporter.report(&ProgressEvent::ListingPage {
            pages: state.pages(),
            collected: state.collected().len(),
        });
    }

    /// Continues with a fresh token unless the cap is met, else finishes
    fn advance(&self, state: &mut CrawlState, next: Option<String>) -> Result<(), SweepError> {
        if state.cap_reached() {
            tracing::info!("Reached the configured cap of videos");
            return state.transition(CrawlPhase::Done);
        }
        if state.offer_token(next) {
            state.transition(CrawlPhase::Paginating)
        } else {
            tracing::debug!("No new continuation token, listing exhausted");
            state.transition(CrawlPhase::Done)
        }
    }
}

/// Runs a crawl with the default tracing progress reporter
///
/// # Example
///
/// ```no_run
/// use channel_sweep::config::load_config;
/// use channel_sweep::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sweep.toml"))?;
/// let outcome = run_crawl(config).await?;
/// println!("{} videos", outcome.result.total_count());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, SweepError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
