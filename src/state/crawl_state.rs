//! Per-crawl mutable state
//!
//! Tracks session keys, the continuation token, discovered video ids and the
//! ordered list of collected summaries. Owned by exactly one crawl.

use crate::entity::EntitySummary;
use crate::state::CrawlPhase;
use crate::SweepError;
use std::collections::HashSet;

/// State for one crawl invocation
#[derive(Debug)]
pub struct CrawlState {
    /// API key extracted from the listing page
    pub session_api_key: String,

    /// Client version extracted from the listing page
    pub client_version: String,

    /// Token for the next page, if the last page offered one
    pub continuation_token: Option<String>,

    seen_ids: HashSet<String>,
    consumed_tokens: HashSet<String>,
    collected: Vec<EntitySummary>,
    max_items: Option<usize>,
    pages: usize,
    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates an empty state in the `Init` phase
    pub fn new(max_items: Option<usize>) -> Self {
        Self {
            session_api_key: String::new(),
            client_version: String::new(),
            continuation_token: None,
            seen_ids: HashSet::new(),
            consumed_tokens: HashSet::new(),
            collected: Vec::new(),
            max_items,
            pages: 0,
            phase: CrawlPhase::Init,
        }
    }

    /// Current phase
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, rejecting transitions the state machine doesn't allow
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), SweepError> {
        if !self.phase.can_transition_to(next) {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Marks the crawl aborted; a no-op if it already finished
    ///
    /// Returns the phase the crawl was in when it failed.
    pub fn abort(&mut self) -> CrawlPhase {
        let failed_in = self.phase;
        if !failed_in.is_terminal() {
            self.phase = CrawlPhase::Aborted;
        }
        failed_in
    }

    /// Merges one page worth of summaries, skipping ids already seen
    ///
    /// Stops early once the cap is reached. Returns how many summaries were added.
    pub fn merge_page(&mut self, entities: Vec<EntitySummary>) -> usize {
        self.pages += 1;
        let mut added = 0;

        for entity in entities {
            if self.cap_reached() {
                break;
            }
            if self.seen_ids.contains(&entity.id) {
                continue;
            }
            self.seen_ids.insert(entity.id.clone());
            self.collected.push(entity);
            added += 1;
        }

        added
    }

    /// Records `next` as the token to follow
    ///
    /// Returns false (and clears the pending token) when `next` is absent or
    /// has already been consumed by this crawl, so a looping API can't keep
    /// the crawl alive forever.
    pub fn offer_token(&mut self, next: Option<String>) -> bool {
        match next {
            Some(token) if !self.consumed_tokens.contains(&token) => {
                self.continuation_token = Some(token);
                true
            }
            Some(token) => {
                tracing::debug!("Continuation token repeated, stopping: {}", token);
                self.continuation_token = None;
                false
            }
            None => {
                self.continuation_token = None;
                false
            }
        }
    }

    /// Takes the pending token and remembers it as consumed
    pub fn consume_token(&mut self) -> Option<String> {
        let token = self.continuation_token.take()?;
        self.consumed_tokens.insert(token.clone());
        Some(token)
    }

    /// True once a configured cap has been met
    pub fn cap_reached(&self) -> bool {
        self.max_items
            .map(|max| self.collected.len() >= max)
            .unwrap_or(false)
    }

    /// Summaries collected so far, in discovery order
    pub fn collected(&self) -> &[EntitySummary] {
        &self.collected
    }

    /// Number of listing pages merged so far
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of distinct ids seen
    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }

    /// Consumes the state, returning the collected summaries truncated to the cap
    pub fn into_entities(self) -> Vec<EntitySummary> {
        let mut collected = self.collected;
        if let Some(max) = self.max_items {
            collected.truncate(max);
        }
        collected
    }
}
