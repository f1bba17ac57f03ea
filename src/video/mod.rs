//! Video pages
//!
//! A `Video` is built from one video page: the JSON-LD metadata block supplies
//! title, description, thumbnail, dates and the content URL; the remaining
//! counters and lists are read from the page markup.

mod builder;
mod patterns;

pub use builder::VideoBuilder;

use crate::{Result, XvError};
use chrono::{DateTime, FixedOffset};
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// Author reported when the page names no uploader
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Metadata of one video page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Upload date as printed by the site
    pub publish_date: Option<String>,
    /// `publish_date` parsed as RFC 3339, when it is one
    pub published_at: Option<DateTime<FixedOffset>>,
    pub content_url: Option<String>,
    pub tags: Vec<String>,
    pub views: Option<String>,
    pub likes: Option<String>,
    pub dislikes: Option<String>,
    pub rating_votes: Option<String>,
    pub comment_count: Option<String>,
    pub author: String,
    pub length: Option<String>,
    pub models: Vec<String>,
    /// Master HLS playlist
    pub hls_url: Option<String>,
}

impl Video {
    /// Builds a video from the HTML of its page
    ///
    /// # Errors
    ///
    /// * `XvError::InvalidUrl` - `url` is not a video page URL
    /// * `XvError::HtmlParse` - the page carries no JSON-LD title
    pub fn from_html(url: &str, html: &str) -> Result<Self> {
        check_url(url)?;

        let metadata = extract_json_ld(html)?;

        let title = json_string(&metadata, "name").ok_or_else(|| XvError::HtmlParse {
            url: url.to_string(),
            message: "no JSON-LD title".to_string(),
        })?;

        let thumbnail_url = match metadata.get("thumbnailUrl") {
            Some(Value::Array(items)) => items.iter().find_map(Value::as_str).map(unescape_html),
            Some(Value::String(s)) => Some(unescape_html(s)),
            _ => None,
        };

        let publish_date = json_string(&metadata, "uploadDate");
        let published_at = publish_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok());

        Ok(Self {
            url: url.to_string(),
            title,
            description: json_string(&metadata, "description"),
            thumbnail_url,
            publish_date,
            published_at,
            content_url: json_string(&metadata, "contentUrl"),
            tags: patterns::all_captures(&patterns::TAGS, html),
            views: patterns::first_capture(&patterns::VIEWS, html),
            likes: patterns::first_capture(&patterns::RATING_LIKES, html),
            dislikes: patterns::first_capture(&patterns::RATING_DISLIKES, html),
            rating_votes: patterns::first_capture(&patterns::RATING_VOTES, html),
            comment_count: patterns::first_capture(&patterns::COMMENT_COUNT, html),
            author: patterns::first_capture(&patterns::UPLOADER, html)
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            length: patterns::first_capture(&patterns::LENGTH, html),
            models: patterns::all_captures(&patterns::MODELS, html),
            hls_url: patterns::first_capture(&patterns::HLS_URL, html),
        })
    }
}

/// Checks that `url` points at a video page (path under `/video`)
pub fn check_url(url: &str) -> Result<Url> {
    let invalid = || XvError::InvalidUrl {
        url: url.to_string(),
    };

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.path().starts_with("/video") {
        return Err(invalid());
    }

    Ok(parsed)
}

/// Merges every JSON-LD object on the page; later keys override earlier ones
fn extract_json_ld(html: &str) -> Result<Map<String, Value>> {
    let script_selector = Selector::parse(r#"script[type="application/ld+json"]"#)
        .map_err(|e| XvError::Extraction(format!("bad JSON-LD selector: {}", e)))?;

    let document = Html::parse_document(html);
    let mut combined = Map::new();

    for script in document.select(&script_selector) {
        let text: String = script.text().collect();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Object(map)) => combined.extend(map),
            Ok(_) => tracing::debug!("Ignoring non-object JSON-LD block"),
            Err(e) => tracing::debug!("Ignoring unparsable JSON-LD block: {}", e),
        }
    }

    Ok(combined)
}

fn json_string(metadata: &Map<String, Value>, key: &str) -> Option<String> {
    metadata.get(key).and_then(Value::as_str).map(unescape_html)
}

/// Decodes HTML entities (`&amp;`, `&#039;`, ...) in a text value
///
/// Only entities change; a literal `<` or `>` is kept as written.
fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
