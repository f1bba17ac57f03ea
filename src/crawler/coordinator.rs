//! Client facade - high level entry points for listings and single videos
//!
//! The client wires one shared HTTP fetcher, the listing extractors and the
//! video builder into the scheduler, so callers only name what they want:
//! - Search results (HTML thumbnail grids)
//! - Channel and model video lists (JSON)
//! - A single video page

use crate::config::{validate, Config};
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::parser::{JsonListingExtractor, ThumbnailGridExtractor};
use crate::crawler::scheduler::Scheduler;
use crate::crawler::stream::ItemStream;
use crate::crawler::traits::{Extractor, ItemBuilder};
use crate::url::{channel_page_urls, model_page_urls, search_page_urls, SearchFilters};
use crate::video::{Video, VideoBuilder};
use crate::Result;
use std::sync::Arc;

/// Entry point for harvesting videos
///
/// # Example
///
/// ```no_run
/// use xvideos_api::{Client, Config, SearchFilters};
///
/// # async fn example() -> xvideos_api::Result<()> {
/// let client = Client::new(Config::default())?;
/// let mut videos = client.search("cats", &SearchFilters::default(), 2)?;
/// while let Some(result) = videos.next_item().await {
///     if let Some(video) = result.item() {
///         println!("{}", video.title);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Client {
    config: Config,
    fetcher: Arc<HttpFetcher>,
    grid_extractor: Arc<ThumbnailGridExtractor>,
    json_extractor: Arc<JsonListingExtractor>,
    builder: Arc<VideoBuilder>,
}

impl Client {
    /// Creates a client from a configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Client)` - Configuration is valid and the HTTP client was built
    /// * `Err(XvError)` - Validation failed or the HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        validate(&config)?;

        let base_url = config.http.base_url.as_str();
        let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
        let grid_extractor = Arc::new(ThumbnailGridExtractor::new(base_url)?);
        let json_extractor = Arc::new(JsonListingExtractor::new(base_url)?);
        let builder = Arc::new(VideoBuilder::new(Arc::clone(&fetcher), base_url)?);

        Ok(Self {
            config,
            fetcher,
            grid_extractor,
            json_extractor,
            builder,
        })
    }

    /// Returns the effective configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches and parses a single video page
    pub async fn get_video(&self, url: &str) -> Result<Video> {
        self.builder.build(url).await
    }

    /// Streams the videos of the first `pages` search result pages
    pub fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
        pages: usize,
    ) -> Result<ItemStream<Video>> {
        let page_urls = search_page_urls(&self.config.http.base_url, query, filters, pages)?;
        tracing::info!("Searching {:?} over {} pages", query, page_urls.len());
        self.run_listing(page_urls, Arc::clone(&self.grid_extractor))
    }

    /// Streams a channel's videos, best first
    pub fn channel_videos(&self, name: &str, pages: usize) -> Result<ItemStream<Video>> {
        let page_urls = channel_page_urls(&self.config.http.base_url, name, pages)?;
        tracing::info!("Listing channel {} over {} pages", name, page_urls.len());
        self.run_listing(page_urls, Arc::clone(&self.json_extractor))
    }

    /// Streams a model's videos, newest first
    pub fn model_videos(&self, name: &str, pages: usize) -> Result<ItemStream<Video>> {
        let page_urls = model_page_urls(&self.config.http.base_url, name, pages)?;
        tracing::info!("Listing model {} over {} pages", name, page_urls.len());
        self.run_listing(page_urls, Arc::clone(&self.json_extractor))
    }

    fn run_listing<X: Extractor>(
        &self,
        page_urls: Vec<String>,
        extractor: Arc<X>,
    ) -> Result<ItemStream<Video>> {
        Scheduler::new(Arc::clone(&self.fetcher), extractor, Arc::clone(&self.builder))
            .with_config(&self.config.pipeline)
            .run(page_urls)
    }
}
