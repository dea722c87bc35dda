//! Channel-Sweep: a channel video catalog crawler
//!
//! This crate walks a video platform's channel listing through its internal
//! pagination API, collects one summary per video, optionally upgrades each
//! summary with the full description from the video's own page, and writes
//! the result as a single JSON document.

pub mod config;
pub mod crawler;
pub mod entity;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Channel-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Listing bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("Pagination failed: {0}")]
    PageFetch(#[from] PageFetchError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while loading the channel listing page
///
/// None of these are retried: a missing key means the page markup no longer
/// matches what the crawler understands (layout change, consent wall, region
/// block), and retrying will not change that.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid channel reference: {0}")]
    InvalidChannel(#[from] UrlError),

    #[error("failed to fetch {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} answered HTTP {status_code}")]
    Status { url: String, status_code: u16 },

    #[error("session key {key} not found in listing page")]
    MissingSessionKey { key: &'static str },

    #[error("no initial data payload found in {url}")]
    MissingInitialData { url: String },
}

/// Failures of a single continuation request
#[derive(Debug, Error)]
pub enum PageFetchError {
    #[error("HTTP {status_code} from browse endpoint, body: {body_excerpt}")]
    Status {
        status_code: u16,
        body_excerpt: String,
    },

    #[error("browse request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("browse response is not valid JSON: {message}")]
    Decode { message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Empty channel reference")]
    EmptyChannel,
}

/// Result type alias for Channel-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use entity::EntitySummary;
pub use output::{write_crawl_result, CrawlResult};
pub use state::{CrawlPhase, CrawlState};
