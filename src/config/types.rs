use serde::Deserialize;

/// Default listing host
pub const DEFAULT_BASE_URL: &str = "https://www.xvideos.com";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Main configuration structure for xvideos-api
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Concurrency limits for the listing pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of listing pages fetched at the same time
    #[serde(rename = "page-concurrency")]
    pub page_concurrency: usize,

    /// Maximum number of video pages built at the same time
    #[serde(rename = "item-concurrency")]
    pub item_concurrency: usize,

    /// Results buffered between the scheduler and a slow consumer
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_concurrency: 4,
            item_concurrency: 16,
            channel_capacity: 32,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Scheme and host every listing and video URL is built on
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Listing defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Number of listing pages walked when a command does not say otherwise
    pub pages: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { pages: 2 }
    }
}
