//! Continuation page fetcher
//!
//! This module issues the internal browse request that turns a
//! continuation token into the next page of listing data.
//!
//! Failures are not retried: an error status usually means the platform is
//! throttling or blocking the session, and hammering it makes that worse.

use crate::crawler::client::PlatformClient;
use crate::url::{browse_endpoint, origin_of};
use crate::PageFetchError;
use reqwest::header::{ORIGIN, REFERER};
use serde_json::{json, Value};

/// Header carrying the numeric client id
pub const CLIENT_NAME_HEADER: &str = "X-YouTube-Client-Name";

/// Header carrying the client version string
pub const CLIENT_VERSION_HEADER: &str = "X-YouTube-Client-Version";

/// Maximum characters of an error body kept for diagnostics
pub const BODY_EXCERPT_CHARS: usize = 500;

/// Fetches the page behind `token`
///
/// Sleeps for the configured politeness delay after a successful call.
///
/// # Arguments
///
/// * `client` - The platform client (HTTP session and client profile)
/// * `api_key` - API key from the listing page
/// * `client_version` - Client version from the listing page
/// * `token` - Continuation token from the previous page
/// * `referer` - The listing URL
///
/// # Errors
///
/// * `PageFetchError::Status` - the endpoint answered with a 4xx/5xx status
/// * `PageFetchError::Http` - network failure or timeout
/// * `PageFetchError::Decode` - the body isn't JSON
pub async fn fetch_next_page(
    client: &PlatformClient,
    api_key: &str,
    client_version: &str,
    token: &str,
    referer: &str,
) -> Result<Value, PageFetchError> {
    let profile = client.profile();
    let endpoint = browse_endpoint(&profile.platform_root, api_key);
    let body = browse_request_body(client, client_version, token);

    tracing::debug!("Requesting continuation page ({} chars of token)", token.len());

    let response = client
        .http()
        .post(&endpoint)
        .header(ORIGIN, origin_of(&profile.platform_root))
        .header(REFERER, referer)
        .header(CLIENT_NAME_HEADER, profile.client_name_id.as_str())
        .header(CLIENT_VERSION_HEADER, client_version)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;

    if status.is_client_error() || status.is_server_error() {
        return Err(PageFetchError::Status {
            status_code: status.as_u16(),
            body_excerpt: body_excerpt(&text, BODY_EXCERPT_CHARS),
        });
    }

    let payload: Value = serde_json::from_str(&text).map_err(|e| PageFetchError::Decode {
        message: e.to_string(),
    })?;

    client.pause().await;

    Ok(payload)
}

/// Builds the JSON body of a browse request
pub fn browse_request_body(client: &PlatformClient, client_version: &str, token: &str) -> Value {
    let profile = client.profile();
    json!({
        "context": {
            "client": {
                "hl": profile.hl,
                "gl": profile.gl,
                "clientName": profile.client_name,
                "clientVersion": client_version,
            }
        },
        "continuation": token,
    })
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn body_excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
