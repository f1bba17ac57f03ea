//! Regular expressions for video page fields that are not in the JSON-LD block

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {}: {}", pattern, e),
    }
}

pub(crate) static HLS_URL: Lazy<Regex> =
    Lazy::new(|| compile(r"html5player\.setVideoHLS\('([^']+)'\);"));
pub(crate) static TAGS: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?s)href="/tags/(.*?)" class="is-keyword"#));
pub(crate) static VIEWS: Lazy<Regex> =
    Lazy::new(|| compile(r#"<strong class="mobile-hide">(.*?)</strong>"#));
pub(crate) static RATING_LIKES: Lazy<Regex> =
    Lazy::new(|| compile(r#"<span class="rating-good-nbr">(.*?)</span>"#));
pub(crate) static RATING_DISLIKES: Lazy<Regex> =
    Lazy::new(|| compile(r#"<span class="rating-bad-nbr">(.*?)</span>"#));
pub(crate) static RATING_VOTES: Lazy<Regex> =
    Lazy::new(|| compile(r#"<span class="rating-total-txt">(.*?)</span>"#));
pub(crate) static COMMENT_COUNT: Lazy<Regex> =
    Lazy::new(|| compile(r#"<span class="badge">(.*?)</span>"#));
pub(crate) static UPLOADER: Lazy<Regex> =
    Lazy::new(|| compile(r#"<a href="/channels/(.*?)" class="btn btn-default label main"#));
pub(crate) static LENGTH: Lazy<Regex> =
    Lazy::new(|| compile(r#"<span class="duration">(.*?)</span>"#));
pub(crate) static MODELS: Lazy<Regex> =
    Lazy::new(|| compile(r#"a href="/models/(.*?)" class="#));

/// First capture group of the first match
pub(crate) fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// First capture group of every match, in document order
pub(crate) fn all_captures(re: &Regex, haystack: &str) -> Vec<String> {
    re.captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
