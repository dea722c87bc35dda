/// Crawl phase definitions for the listing/pagination state machine
///
/// This module defines the phases a single crawl passes through and which
/// moves between them are legal.
use std::fmt;

/// Represents where a crawl currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Nothing fetched yet
    Init,

    /// Listing page loaded and session keys extracted
    ListingLoaded,

    /// Following continuation tokens
    Paginating,

    // ===== Terminal Phases =====
    /// Listing exhausted, stalled, or cap reached
    Done,

    /// A fatal error ended the crawl
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Any active phase may abort. `Paginating -> Paginating` is the loop edge.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (from, Self::Aborted) => !from.is_terminal(),
            (Self::Init, Self::ListingLoaded) => true,
            (Self::ListingLoaded, Self::Paginating) => true,
            (Self::ListingLoaded, Self::Done) => true,
            (Self::Paginating, Self::Paginating) => true,
            (Self::Paginating, Self::Done) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ListingLoaded => "listing_loaded",
            Self::Paginating => "paginating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Init,
            Self::ListingLoaded,
            Self::Paginating,
            Self::Done,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
