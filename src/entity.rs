//! Video summaries collected from the channel listing

/// One video as seen on the channel listing
///
/// Identity is `id`: two summaries with the same id describe the same video
/// no matter how the other fields differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    /// Opaque platform video id, never empty
    pub id: String,

    /// Watch page URL derived from `id`
    pub canonical_url: String,

    pub title: String,

    /// Listing snippet, possibly truncated; the description pass may replace it
    pub short_description: String,

    /// Highest-resolution thumbnail offered by the listing, or empty
    pub thumbnail_url: String,
}

impl EntitySummary {
    /// Creates a summary with only identity fields set
    pub fn new(id: impl Into<String>, canonical_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            canonical_url: canonical_url.into(),
            title: String::new(),
            short_description: String::new(),
            thumbnail_url: String::new(),
        }
    }
}
