//! Crawler module for listing harvests
//!
//! This module contains the pipeline and the collaborators it is wired with:
//! - The ordered fetch-expand scheduler and its result stream
//! - HTTP fetching with error classification
//! - Listing page extractors (HTML grids, JSON lists)
//! - The `Client` facade tying them to the configuration

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod stream;
mod traits;

pub use coordinator::Client;
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher};
pub use parser::{
    extract_json_links, extract_thumbnail_links, JsonListingExtractor, ThumbnailGridExtractor,
};
pub use scheduler::{run_pipeline, Scheduler};
pub use stream::ItemStream;
pub use traits::{Extractor, ItemBuilder, PageFetcher};
