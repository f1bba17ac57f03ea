//! xvideos-api: ordered concurrent listing harvester
//!
//! This crate enumerates videos spread across paginated listing pages (search
//! results, channel and model pages). Listing pages and video pages are fetched
//! concurrently, and results are handed back as a lazy stream in the exact
//! order the listings present them.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;
pub mod video;

use thiserror::Error;

/// Main error type for xvideos-api operations
#[derive(Debug, Error)]
pub enum XvError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Not a video URL: {url}")]
    InvalidUrl { url: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Listing extraction failed: {0}")]
    Extraction(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {pool} concurrency: {value} (must be at least 1)")]
    InvalidConcurrency { pool: &'static str, value: usize },

    #[error("Item builder panicked while building {url}")]
    BuilderPanicked { url: String },

    #[error("Task for {url} ended without a result: {message}")]
    TaskLost { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl XvError {
    /// Short, stable name of the error variant, used to group failures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Timeout { .. } => "timeout",
            Self::Network { .. } => "network",
            Self::HttpStatus { .. } => "http-status",
            Self::Reqwest(_) => "http-client",
            Self::UrlError(_) | Self::UrlParse(_) => "url",
            Self::InvalidUrl { .. } => "invalid-url",
            Self::HtmlParse { .. } => "html-parse",
            Self::Extraction(_) => "extraction",
            Self::Json(_) => "json",
            Self::InvalidConcurrency { .. } => "invalid-concurrency",
            Self::BuilderPanicked { .. } => "builder-panic",
            Self::TaskLost { .. } => "task-lost",
            Self::Io(_) => "io",
        }
    }
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

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Invalid listing name: {0:?}")]
    InvalidName(String),
}

/// Result type alias for xvideos-api operations
pub type Result<T> = std::result::Result<T, XvError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Client, ItemBuilder, ItemStream, PageFetcher, Scheduler};
pub use state::{CursorState, ItemCoordinate, ItemResult};
pub use url::{SearchFilters, Sort, SortDate, SortQuality, SortVideoTime};
pub use video::Video;
