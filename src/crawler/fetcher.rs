//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for listing pages and video pages
//! - Error classification (status codes, timeouts, connection failures)

use crate::config::HttpConfig;
use crate::crawler::traits::PageFetcher;
use crate::{Result, XvError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request ran out of time
        timed_out: bool,
    },
}

impl FetchResult {
    /// Converts the classified result into the body or a crate error
    pub fn into_body(self, url: &str) -> Result<String> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::HttpError { status_code } => Err(XvError::HttpStatus {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { timed_out: true, .. } => Err(XvError::Timeout {
                url: url.to_string(),
            }),
            Self::NetworkError { error, .. } => Err(XvError::Network {
                url: url.to_string(),
                message: error,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// HTTPS is enforced when the configured base URL is itself HTTPS.
///
/// # Example
///
/// ```no_run
/// use xvideos_api::config::HttpConfig;
/// use xvideos_api::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client> {
    let https_only = Url::parse(&config.base_url)?.scheme() == "https";

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .https_only(https_only)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError (timed out) |
/// | Connection refused, TLS, body read | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!("Rate limited while fetching {}", url);
            }

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    timed_out: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                    timed_out: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: false,
                }
            }
        }
    }
}

/// Page fetcher backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let result = fetch_url(&self.client, url).await;
        if let FetchResult::Success {
            final_url,
            status_code,
            body,
        } = &result
        {
            tracing::debug!(
                "Fetched {} ({} bytes, HTTP {}, final URL {})",
                url,
                body.len(),
                status_code,
                final_url
            );
        }
        result.into_body(url)
    }
}
