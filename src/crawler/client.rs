//! Caller-owned HTTP client configuration
//!
//! Every component that talks to the platform receives a `PlatformClient`
//! explicitly. It bundles the reqwest client (with its cookie jar and
//! default headers) and the client identity sent to the internal API.

use crate::config::{ClientConfig, Config};
use crate::{ConfigError, SweepError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

/// Identity and pacing used for internal API calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    /// Scheme and host every endpoint hangs off
    pub platform_root: String,

    pub hl: String,
    pub gl: String,
    pub client_name: String,
    pub client_name_id: String,

    /// Pause applied after each continuation request and each detail fetch
    pub request_delay: Duration,
}

impl ClientProfile {
    /// Builds the profile from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            platform_root: config.client.platform_root.trim_end_matches('/').to_string(),
            hl: config.client.hl.clone(),
            gl: config.client.gl.clone(),
            client_name: config.client.client_name.clone(),
            client_name_id: config.client.client_name_id.clone(),
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
        }
    }
}

/// HTTP session shared by the listing, browse and detail fetches of one crawl
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: Client,
    profile: ClientProfile,
}

impl PlatformClient {
    /// Builds the client and profile from configuration
    pub fn new(config: &Config) -> Result<Self, SweepError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let http = build_http_client(&config.client, timeout)?;
        Ok(Self {
            http,
            profile: ClientProfile::from_config(config),
        })
    }

    /// Wraps an existing reqwest client
    pub fn from_parts(http: Client, profile: ClientProfile) -> Self {
        Self { http, profile }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    /// Sleeps for the configured politeness delay
    pub async fn pause(&self) {
        if !self.profile.request_delay.is_zero() {
            tokio::time::sleep(self.profile.request_delay).await;
        }
    }
}

/// Builds an HTTP client with a browser-like identity
///
/// The client keeps cookies between requests and sends the configured
/// `User-Agent` and `Accept-Language` on every request.
///
/// # Example
///
/// ```no_run
/// use channel_sweep::config::ClientConfig;
/// use channel_sweep::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&ClientConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(config: &ClientConfig, timeout: Duration) -> Result<Client, SweepError> {
    let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|e| {
        ConfigError::Validation(format!("Invalid accept_language header value: {}", e))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, accept_language);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .cookie_store(true)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}
