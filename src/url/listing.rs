//! Listing page URL construction
//!
//! Listing pages are numbered from 0. Search results come back as HTML
//! thumbnail grids; channel and model video lists come back as JSON.

use crate::url::{parse_base_url, SearchFilters};
use crate::{UrlError, UrlResult};

/// Builds the URLs of the first `pages` search result pages
///
/// Spaces in the query are sent as `+`.
///
/// # Examples
///
/// ```
/// use xvideos_api::url::{search_page_urls, SearchFilters};
///
/// let urls = search_page_urls("https://www.xvideos.com", "two words", &SearchFilters::default(), 1).unwrap();
/// assert_eq!(
///     urls[0],
///     "https://www.xvideos.com/?k=two+words&sort=relevance&datef=all&durf=allduration&quality=all&p=0"
/// );
/// ```
pub fn search_page_urls(
    base_url: &str,
    query: &str,
    filters: &SearchFilters,
    pages: usize,
) -> UrlResult<Vec<String>> {
    let base = parse_base_url(base_url)?;

    let urls = (0..pages)
        .map(|page| {
            let mut url = base.join("/").unwrap_or_else(|_| base.clone());
            url.query_pairs_mut()
                .append_pair("k", query)
                .append_pair("sort", filters.sort.as_str())
                .append_pair("datef", filters.date.as_str())
                .append_pair("durf", filters.duration.as_str())
                .append_pair("quality", filters.quality.as_str())
                .append_pair("p", &page.to_string());
            url.to_string()
        })
        .collect();

    Ok(urls)
}

/// Builds the URLs of a channel's video list pages (best first)
pub fn channel_page_urls(base_url: &str, channel: &str, pages: usize) -> UrlResult<Vec<String>> {
    named_listing_urls(base_url, "channels", channel, "best", pages)
}

/// Builds the URLs of a model's video list pages (newest first)
pub fn model_page_urls(base_url: &str, model: &str, pages: usize) -> UrlResult<Vec<String>> {
    named_listing_urls(base_url, "models", model, "new", pages)
}

fn named_listing_urls(
    base_url: &str,
    section: &str,
    name: &str,
    order: &str,
    pages: usize,
) -> UrlResult<Vec<String>> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('?') || name.contains('#') {
        return Err(UrlError::InvalidName(name.to_string()));
    }

    let base = parse_base_url(base_url)?;

    (0..pages)
        .map(|page| {
            base.join(&format!("/{}/{}/videos/{}/{}", section, name, order, page))
                .map(|url| url.to_string())
                .map_err(|e| UrlError::Parse(e.to_string()))
        })
        .collect()
}
