//! Markdown summary generation
//!
//! This module generates human-readable markdown reports of a harvest: run
//! information, delivered videos in stream order, and the failures that were
//! delivered as placeholders.

use crate::output::traits::{HarvestSummary, OutputResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary and writes it to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &HarvestSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a harvest summary as markdown
pub fn format_markdown_summary(summary: &HarvestSummary) -> String {
    let mut md = String::new();

    md.push_str("# xvideos-api Harvest Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Source**: {}\n", summary.source));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = summary.duration_seconds() {
        md.push_str(&format!("- **Duration**: {} seconds\n", duration));
    }
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Results Delivered**: {}\n", summary.total()));
    md.push_str(&format!("- **Videos**: {}\n", summary.delivered.len()));
    md.push_str(&format!("- **Placeholders**: {}\n", summary.failures.len()));
    md.push_str(&format!("- **Success Rate**: {:.2}%\n", summary.success_rate()));
    md.push_str(&format!("- **Error Rate**: {:.2}%\n\n", summary.error_rate()));

    if !summary.delivered.is_empty() {
        md.push_str("## Videos\n\n");
        md.push_str("| Page | Position | Title | Author | Length | Views |\n");
        md.push_str("|------|----------|-------|--------|--------|-------|\n");
        for video in &summary.delivered {
            md.push_str(&format!(
                "| {} | {} | [{}]({}) | {} | {} | {} |\n",
                video.coordinate.page_index,
                video.coordinate.item_index,
                escape_cell(&video.title),
                video.url,
                escape_cell(&video.author),
                video.length.as_deref().unwrap_or("-"),
                video.views.as_deref().unwrap_or("-"),
            ));
        }
        md.push('\n');
    }

    if !summary.failures.is_empty() {
        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for failure in &summary.failures {
            *by_kind.entry(failure.kind).or_insert(0) += 1;
        }

        md.push_str("## Error Summary\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");
        for (kind, count) in &by_kind {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');

        md.push_str("## Failed Videos\n\n");
        md.push_str("| Page | Position | URL | Error |\n");
        md.push_str("|------|----------|-----|-------|\n");
        for failure in &summary.failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                failure.coordinate.page_index,
                failure.coordinate.item_index,
                failure.url,
                escape_cell(&failure.message),
            ));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Generated by xvideos-api v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
