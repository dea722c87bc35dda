//! Session bootstrap from the channel listing page
//!
//! The listing page carries everything needed to talk to the internal
//! browse API: an API key, the web client version, and the first page of
//! results as embedded JSON.

use crate::crawler::client::PlatformClient;
use crate::crawler::embedded::{extract_assigned_json, INITIAL_DATA_VAR};
use crate::url::listing_url;
use crate::BootstrapError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const API_KEY_NAME: &str = "INNERTUBE_API_KEY";
pub const CLIENT_VERSION_NAME: &str = "INNERTUBE_CLIENT_VERSION";

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("valid api key pattern")
});

static CLIENT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_CLIENT_VERSION"\s*:\s*"([^"]+)""#)
        .expect("valid client version pattern")
});

/// Everything the crawl loop needs from the listing page
#[derive(Debug, Clone)]
pub struct Session {
    pub api_key: String,
    pub client_version: String,

    /// Embedded initial data, walked as the first page
    pub first_payload: Value,

    /// Listing URL, also sent as `Referer` on continuation requests
    pub listing_url: String,
}

/// Loads the channel's videos tab and extracts the session
///
/// # Errors
///
/// * `BootstrapError::InvalidChannel` - the channel reference can't be resolved
/// * `BootstrapError::Http` / `BootstrapError::Status` - the page couldn't be loaded
/// * `BootstrapError::MissingSessionKey` / `BootstrapError::MissingInitialData` -
///   the page loaded but doesn't look like a listing page
pub async fn bootstrap(
    client: &PlatformClient,
    channel_root: &str,
) -> Result<Session, BootstrapError> {
    let listing_url = listing_url(channel_root, &client.profile().platform_root)?;
    tracing::info!("Loading channel listing: {}", listing_url);

    let response = client
        .http()
        .get(&listing_url)
        .send()
        .await
        .map_err(|source| BootstrapError::Http {
            url: listing_url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BootstrapError::Status {
            url: listing_url,
            status_code: status.as_u16(),
        });
    }

    let html = response.text().await.map_err(|source| BootstrapError::Http {
        url: listing_url.clone(),
        source,
    })?;

    parse_listing_page(&html, listing_url)
}

/// Extracts the session from an already-fetched listing page
pub fn parse_listing_page(html: &str, listing_url: String) -> Result<Session, BootstrapError> {
    let (api_key, client_version) = extract_session_keys(html)?;
    let first_payload = extract_assigned_json(html, INITIAL_DATA_VAR).ok_or_else(|| {
        BootstrapError::MissingInitialData {
            url: listing_url.clone(),
        }
    })?;

    tracing::debug!("Session bootstrapped (client version {})", client_version);

    Ok(Session {
        api_key,
        client_version,
        first_payload,
        listing_url,
    })
}

/// Finds the API key and client version in the page source
pub fn extract_session_keys(html: &str) -> Result<(String, String), BootstrapError> {
    let api_key = capture(&API_KEY_RE, html).ok_or(BootstrapError::MissingSessionKey {
        key: API_KEY_NAME,
    })?;
    let client_version = capture(&CLIENT_VERSION_RE, html).ok_or(
        BootstrapError::MissingSessionKey {
            key: CLIENT_VERSION_NAME,
        },
    )?;
    Ok((api_key, client_version))
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
