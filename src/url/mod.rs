//! URL handling module for xvideos-api
//!
//! This module builds listing page URLs (search, channel, model), resolves
//! links found on listing pages, and recognises video page URLs.

mod listing;
mod sorting;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use listing::{channel_page_urls, model_page_urls, search_page_urls};
pub use sorting::{SearchFilters, Sort, SortDate, SortQuality, SortVideoTime};

/// Parses and checks a base URL (scheme plus host)
pub fn parse_base_url(base_url: &str) -> UrlResult<Url> {
    let url = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Resolves an href found on a listing page to an absolute URL
///
/// Returns None for empty hrefs, fragment-only links, non-HTTP(S) schemes and
/// anything that fails to parse.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

/// Returns true if `url` is a video page on the same host as `base_url`
///
/// Video pages live under `/video...` (both `/video12345/title` and
/// `/video.abcdef/title` forms).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use xvideos_api::url::is_video_url;
///
/// let base = Url::parse("https://www.xvideos.com").unwrap();
/// let video = Url::parse("https://www.xvideos.com/video79875801/some_title").unwrap();
/// let tag = Url::parse("https://www.xvideos.com/tags/some_tag").unwrap();
///
/// assert!(is_video_url(&video, &base));
/// assert!(!is_video_url(&tag, &base));
/// ```
pub fn is_video_url(url: &Url, base_url: &Url) -> bool {
    let same_host = match (url.host_str(), base_url.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    };

    same_host && url.port_or_known_default() == base_url.port_or_known_default()
        && url.path().starts_with("/video")
}
