//! Run statistics
//!
//! Counters accumulated from the results a consumer actually received, and
//! printed when a listing command finishes.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::state::ItemResult;
use crate::video::Video;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Number of built videos delivered
    pub built: u64,

    /// Number of error placeholders delivered
    pub placeholders: u64,

    /// Placeholders grouped by error kind
    pub failures_by_kind: BTreeMap<&'static str, u64>,

    /// Highest page index a result was delivered for
    pub last_page: Option<usize>,

    started: Instant,
    elapsed: Option<Duration>,
}

impl HarvestStatistics {
    pub fn new() -> Self {
        Self {
            built: 0,
            placeholders: 0,
            failures_by_kind: BTreeMap::new(),
            last_page: None,
            started: Instant::now(),
            elapsed: None,
        }
    }

    /// Total number of results delivered
    pub fn total(&self) -> u64 {
        self.built + self.placeholders
    }

    /// Time from creation until `finish`, or until now while still running
    pub fn elapsed(&self) -> Duration {
        self.elapsed.unwrap_or_else(|| self.started.elapsed())
    }
}

impl Default for HarvestStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputHandler for HarvestStatistics {
    fn record(&mut self, result: &ItemResult<Video>) -> OutputResult<()> {
        match result {
            ItemResult::Built { .. } => self.built += 1,
            ItemResult::Placeholder { error, .. } => {
                self.placeholders += 1;
                *self.failures_by_kind.entry(error.kind()).or_insert(0) += 1;
            }
        }
        self.last_page = Some(result.coordinate().page_index);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.elapsed = Some(self.started.elapsed());
        Ok(())
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is left alone so JSON lines output stays machine readable.
pub fn print_statistics(stats: &HarvestStatistics) {
    eprintln!("=== Harvest Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Results delivered: {}", stats.total());
    eprintln!("  Videos built: {}", stats.built);
    eprintln!("  Placeholders: {}", stats.placeholders);
    if let Some(page) = stats.last_page {
        eprintln!("  Listing pages with results: up to page {}", page);
    }
    eprintln!("  Elapsed: {:.2}s", stats.elapsed().as_secs_f64());
    eprintln!();

    if !stats.failures_by_kind.is_empty() {
        eprintln!("Error Summary:");
        let mut error_counts: Vec<_> = stats.failures_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (kind, count) in error_counts {
            eprintln!("  {}: {}", kind, count);
        }
        eprintln!();
    }

    let success_rate = if stats.total() > 0 {
        (stats.built as f64 / stats.total() as f64) * 100.0
    } else {
        0.0
    };

    eprintln!(
        "Success Rate: {:.1}% ({} / {} videos built)",
        success_rate,
        stats.built,
        stats.total()
    );
}
