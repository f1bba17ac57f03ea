//! Collaborator traits consumed by the scheduler
//!
//! The scheduler only knows how to order work; fetching listing pages, pulling
//! item URLs out of them, and building items are plugged in through these
//! traits. Implementations run on many tasks at once and must be `Send + Sync`.

use crate::Result;
use async_trait::async_trait;

/// Retrieves the raw content behind a URL
#[async_trait]
pub trait PageFetcher: Send + Sync + 'static {
    /// Fetches `url` and returns its body
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Pulls the ordered list of item URLs out of one listing page
///
/// The returned order defines each item's position within its page. An empty
/// list is a valid answer for an empty page.
pub trait Extractor: Send + Sync + 'static {
    fn extract(&self, content: &str) -> Result<Vec<String>>;
}

impl<F> Extractor for F
where
    F: Fn(&str) -> Result<Vec<String>> + Send + Sync + 'static,
{
    fn extract(&self, content: &str) -> Result<Vec<String>> {
        self(content)
    }
}

/// Turns one item URL into a domain object
///
/// Errors are returned, never raised; the scheduler records them as
/// placeholders at the item's position.
#[async_trait]
pub trait ItemBuilder: Send + Sync + 'static {
    type Item: Send + 'static;

    async fn build(&self, url: &str) -> Result<Self::Item>;
}
