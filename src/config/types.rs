use serde::Deserialize;

/// Main configuration structure for Channel-Sweep
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub channel: ChannelConfig,
    pub crawler: CrawlerConfig,
    pub client: ClientConfig,
    pub output: OutputConfig,
}

/// Which channel to crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel URL (`https://host/@name`) or bare handle (`@name`)
    pub root: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Run the second pass that fetches each video page for its full description
    #[serde(rename = "fetch-full-description")]
    pub fetch_full_description: bool,

    /// Stop after this many videos (discovery order)
    #[serde(rename = "max-videos")]
    pub max_videos: Option<usize>,

    /// Pause after every continuation request and every detail fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Maximum number of detail pages fetched at once
    #[serde(rename = "enrich-concurrency")]
    pub enrich_concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_full_description: true,
            max_videos: None,
            request_delay_ms: 150,
            enrich_concurrency: 1,
            request_timeout_secs: 30,
        }
    }
}

/// How the crawler presents itself to the platform
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the platform; all endpoints hang off this root
    #[serde(rename = "platform-root")]
    pub platform_root: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Interface language sent in the client context
    pub hl: String,

    /// Region sent in the client context
    pub gl: String,

    /// Client name sent in the client context
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Numeric client id sent in the client-name header
    #[serde(rename = "client-name-id")]
    pub client_name_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            platform_root: "https://www.youtube.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            accept_language: "pt-BR,pt;q=0.9,en;q=0.8".to_string(),
            hl: "pt-BR".to_string(),
            gl: "BR".to_string(),
            client_name: "WEB".to_string(),
            client_name_id: "1".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON document written at the end of the crawl
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "youtube_videos.json".to_string(),
        }
    }
}
