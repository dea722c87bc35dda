//! Channel reference resolution
//!
//! A channel can be named by full URL (`https://host/@name`), by a bare
//! handle (`@name`) or by a path relative to the platform root
//! (`channel/UC...`). All of these resolve to the channel's videos tab.

use crate::{UrlError, UrlResult};
use url::Url;

const VIDEOS_TAB: &str = "videos";

/// Parses the platform root, rejecting anything that isn't http(s)
pub fn parse_platform_root(platform_root: &str) -> UrlResult<Url> {
    let url = Url::parse(platform_root).map_err(|e| UrlError::Parse(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Resolves a channel reference to an absolute channel URL without a trailing slash
pub fn resolve_channel_root(channel: &str, platform_root: &str) -> UrlResult<String> {
    let channel = channel.trim();
    if channel.is_empty() {
        return Err(UrlError::EmptyChannel);
    }

    if channel.starts_with("http://") || channel.starts_with("https://") {
        let url = Url::parse(channel).map_err(|e| UrlError::Parse(e.to_string()))?;
        return Ok(channel_path_only(url));
    }

    if channel.contains("://") {
        let scheme = channel.split("://").next().unwrap_or_default();
        return Err(UrlError::InvalidScheme(scheme.to_string()));
    }

    let root = parse_platform_root(platform_root)?;
    let joined = root
        .join(channel.trim_start_matches('/'))
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(channel_path_only(joined))
}

/// Drops share-link query strings and fragments so the tab can be appended to the path
fn channel_path_only(mut url: Url) -> String {
    url.set_query(None);
    url.set_fragment(None);
    url.as_str().trim_end_matches('/').to_string()
}

/// Returns the URL of the channel's videos tab
///
/// # Examples
///
/// ```
/// use channel_sweep::url::listing_url;
///
/// let url = listing_url("https://www.youtube.com/@SomeChannel/", "https://www.youtube.com").unwrap();
/// assert_eq!(url, "https://www.youtube.com/@SomeChannel/videos");
///
/// let url = listing_url("@SomeChannel", "https://www.youtube.com").unwrap();
/// assert_eq!(url, "https://www.youtube.com/@SomeChannel/videos");
/// ```
pub fn listing_url(channel: &str, platform_root: &str) -> UrlResult<String> {
    let root = resolve_channel_root(channel, platform_root)?;
    let last_segment = root.rsplit('/').next().unwrap_or_default();
    if last_segment == VIDEOS_TAB {
        Ok(root)
    } else {
        Ok(format!("{}/{}", root, VIDEOS_TAB))
    }
}

/// Canonical watch URL for a video id
///
/// Deterministic in `video_id`; the platform root only supplies scheme and host.
pub fn video_url(platform_root: &str, video_id: &str) -> String {
    format!("{}/watch?v={}", platform_root.trim_end_matches('/'), video_id)
}

/// Absolute URL of the internal browse endpoint
pub fn browse_endpoint(platform_root: &str, api_key: &str) -> String {
    format!(
        "{}/youtubei/v1/browse?key={}",
        platform_root.trim_end_matches('/'),
        api_key
    )
}

/// Origin header value for the platform (scheme + host + port)
pub fn origin_of(platform_root: &str) -> String {
    match Url::parse(platform_root) {
        Ok(url) => url.origin().ascii_serialization(),
        Err(_) => platform_root.trim_end_matches('/').to_string(),
    }
}
