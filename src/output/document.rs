//! Crawl result and its JSON document shape

use crate::entity::EntitySummary;
use serde::Serialize;

/// Final product of a crawl
///
/// Immutable once built; `total_count()` always equals the number of entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlResult {
    channel_root: String,
    listing_url: String,
    entities: Vec<EntitySummary>,
}

impl CrawlResult {
    pub fn new(
        channel_root: impl Into<String>,
        listing_url: impl Into<String>,
        entities: Vec<EntitySummary>,
    ) -> Self {
        Self {
            channel_root: channel_root.into(),
            listing_url: listing_url.into(),
            entities,
        }
    }

    /// Channel reference as given by the caller
    pub fn channel_root(&self) -> &str {
        &self.channel_root
    }

    /// Resolved videos-tab URL
    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    pub fn total_count(&self) -> usize {
        self.entities.len()
    }

    /// Videos in discovery order
    pub fn entities(&self) -> &[EntitySummary] {
        &self.entities
    }

    /// Borrowed view in the on-disk document layout
    pub fn to_document(&self) -> OutputDocument<'_> {
        OutputDocument {
            channel: &self.channel_root,
            videos_tab: &self.listing_url,
            count: self.total_count(),
            videos: self
                .entities
                .iter()
                .map(|entity| VideoRecord {
                    url: &entity.canonical_url,
                    title: &entity.title,
                    description: &entity.short_description,
                    thumbnail: &entity.thumbnail_url,
                })
                .collect(),
        }
    }
}

/// `{ channel, videos_tab, count, videos: [...] }`
#[derive(Debug, Serialize)]
pub struct OutputDocument<'a> {
    pub channel: &'a str,
    pub videos_tab: &'a str,
    pub count: usize,
    pub videos: Vec<VideoRecord<'a>>,
}

/// One entry of `videos`
#[derive(Debug, Serialize)]
pub struct VideoRecord<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub thumbnail: &'a str,
}
