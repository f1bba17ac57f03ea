//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the data
//! collected for harvest summaries.

use crate::state::{ItemCoordinate, ItemResult};
use crate::video::Video;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives every delivered result of a run, in delivery order
pub trait OutputHandler {
    fn record(&mut self, result: &ItemResult<Video>) -> OutputResult<()>;

    /// Called once after the last result
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// A video that was delivered successfully
#[derive(Debug, Clone)]
pub struct DeliveredVideo {
    pub coordinate: ItemCoordinate,
    pub url: String,
    pub title: String,
    pub author: String,
    pub length: Option<String>,
    pub views: Option<String>,
}

/// A placeholder delivered in place of a video
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub coordinate: ItemCoordinate,
    pub url: String,
    /// Error variant name (see `XvError::kind`)
    pub kind: &'static str,
    pub message: String,
}

/// Everything the markdown report is rendered from
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    /// What was harvested, e.g. `search "cats"`
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config_hash: Option<String>,
    pub delivered: Vec<DeliveredVideo>,
    pub failures: Vec<FailedItem>,
}

impl HarvestSummary {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            started_at: Utc::now(),
            finished_at: None,
            config_hash: None,
            delivered: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Total number of results delivered, placeholders included
    pub fn total(&self) -> usize {
        self.delivered.len() + self.failures.len()
    }

    /// Percentage of results that are built videos
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.delivered.len() as f64 / self.total() as f64) * 100.0
    }

    /// Percentage of results that are placeholders
    pub fn error_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.failures.len() as f64 / self.total() as f64) * 100.0
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl OutputHandler for HarvestSummary {
    fn record(&mut self, result: &ItemResult<Video>) -> OutputResult<()> {
        match result {
            ItemResult::Built { coordinate, item } => self.delivered.push(DeliveredVideo {
                coordinate: *coordinate,
                url: item.url.clone(),
                title: item.title.clone(),
                author: item.author.clone(),
                length: item.length.clone(),
                views: item.views.clone(),
            }),
            ItemResult::Placeholder {
                coordinate,
                url,
                error,
            } => self.failures.push(FailedItem {
                coordinate: *coordinate,
                url: url.clone(),
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished_at = Some(Utc::now());
        Ok(())
    }
}
