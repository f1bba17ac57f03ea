//! Listing page extractors
//!
//! This module turns one fetched listing page into the ordered list of video
//! URLs it contains:
//! - HTML thumbnail grids (search results)
//! - JSON video lists (channel and model pages)
//!
//! Both extractors resolve links against the configured base URL and keep only
//! video page URLs. Everything they return is scheduled; duplicates are not
//! removed.

use crate::crawler::traits::Extractor;
use crate::url::{is_video_url, parse_base_url, resolve_link};
use crate::{Result, XvError};
use scraper::{Html, Selector};
use serde::Deserialize;
use url::Url;

/// Extracts video links from an HTML thumbnail grid
///
/// For every `div.thumb` the first `a[href]` inside it is taken.
///
/// # Example
///
/// ```
/// use xvideos_api::crawler::{Extractor, ThumbnailGridExtractor};
///
/// let extractor = ThumbnailGridExtractor::new("https://www.xvideos.com").unwrap();
/// let html = r#"<div class="thumb"><a href="/video1/first">1</a></div>"#;
/// let urls = extractor.extract(html).unwrap();
/// assert_eq!(urls, vec!["https://www.xvideos.com/video1/first"]);
/// ```
#[derive(Debug, Clone)]
pub struct ThumbnailGridExtractor {
    base_url: Url,
}

impl ThumbnailGridExtractor {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
        })
    }
}

impl Extractor for ThumbnailGridExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        extract_thumbnail_links(content, &self.base_url)
    }
}

/// Extracts video links from the HTML of a thumbnail grid
pub fn extract_thumbnail_links(html: &str, base_url: &Url) -> Result<Vec<String>> {
    let thumb_selector = selector("div.thumb")?;
    let link_selector = selector("a[href]")?;

    let document = Html::parse_document(html);

    let links = document
        .select(&thumb_selector)
        .filter_map(|thumb| thumb.select(&link_selector).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_video_link(href, base_url))
        .collect();

    Ok(links)
}

/// JSON payload served for channel and model video lists
#[derive(Debug, Deserialize)]
struct VideoListPayload {
    #[serde(default)]
    videos: Vec<VideoListEntry>,
}

#[derive(Debug, Deserialize)]
struct VideoListEntry {
    /// Relative video page URL
    #[serde(default)]
    u: Option<String>,
}

/// Extracts video links from a JSON video list (`{"videos": [{"u": ...}]}`)
#[derive(Debug, Clone)]
pub struct JsonListingExtractor {
    base_url: Url,
}

impl JsonListingExtractor {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
        })
    }
}

impl Extractor for JsonListingExtractor {
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        extract_json_links(content, &self.base_url)
    }
}

/// Extracts video links from a JSON video list payload
///
/// Malformed JSON is an error; entries without a usable `u` are skipped.
pub fn extract_json_links(json: &str, base_url: &Url) -> Result<Vec<String>> {
    let payload: VideoListPayload = serde_json::from_str(json)?;

    Ok(payload
        .videos
        .iter()
        .filter_map(|entry| entry.u.as_deref())
        .filter_map(|href| resolve_video_link(href, base_url))
        .collect())
}

fn resolve_video_link(href: &str, base_url: &Url) -> Option<String> {
    let url = resolve_link(href, base_url)?;
    if is_video_url(&url, base_url) {
        Some(url.to_string())
    } else {
        tracing::trace!("Skipping non-video link {}", url);
        None
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| XvError::Extraction(format!("bad selector {}: {}", css, e)))
}
