//! Output module for harvest results and reports
//!
//! This module handles:
//! - JSON lines output of delivered videos
//! - Generating markdown summaries of a harvest
//! - Recording run statistics

mod json;
mod markdown;
pub mod stats;
mod traits;

pub use json::{write_json_line, JsonLinesOutput};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, HarvestStatistics};
pub use traits::{
    DeliveredVideo, FailedItem, HarvestSummary, OutputError, OutputHandler, OutputResult,
};
