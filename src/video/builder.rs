//! Item builder producing `Video`s from video page URLs

use super::Video;
use crate::crawler::{HttpFetcher, ItemBuilder, PageFetcher};
use crate::url::{is_video_url, parse_base_url};
use crate::{Result, XvError};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

/// Fetches a video page and parses it into a `Video`
///
/// URLs that are not video pages of the configured site are rejected before
/// any request is made.
pub struct VideoBuilder<F: PageFetcher = HttpFetcher> {
    fetcher: Arc<F>,
    base_url: Url,
}

impl<F: PageFetcher> VideoBuilder<F> {
    pub fn new(fetcher: Arc<F>, base_url: &str) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Checks `url` against the configured site
    fn check(&self, url: &str) -> Result<()> {
        let parsed = super::check_url(url)?;
        if !is_video_url(&parsed, &self.base_url) {
            return Err(XvError::InvalidUrl {
                url: url.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<F: PageFetcher> ItemBuilder for VideoBuilder<F> {
    type Item = Video;

    async fn build(&self, url: &str) -> Result<Video> {
        self.check(url)?;

        let html = self.fetcher.fetch(url).await?;
        let video = Video::from_html(url, &html)?;

        tracing::debug!("Built video {:?} from {}", video.title, url);
        Ok(video)
    }
}
