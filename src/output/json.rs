//! JSON lines output
//!
//! One JSON object per delivered result: the video itself for built items, or
//! an object with `page`, `position`, `url` and `error` for placeholders.

use crate::output::traits::{OutputHandler, OutputResult};
use crate::state::ItemResult;
use crate::video::Video;
use serde::Serialize;
use serde_json::json;
use std::io::Write;

/// Serialises `value` as one line of JSON
pub fn write_json_line<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> OutputResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Writes every delivered result as a JSON line
pub struct JsonLinesOutput<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputHandler for JsonLinesOutput<W> {
    fn record(&mut self, result: &ItemResult<Video>) -> OutputResult<()> {
        match result {
            ItemResult::Built { item, .. } => write_json_line(&mut self.writer, item),
            ItemResult::Placeholder {
                coordinate,
                url,
                error,
            } => {
                let line = json!({
                    "page": coordinate.page_index,
                    "position": coordinate.item_index,
                    "url": url,
                    "error": error.to_string(),
                });
                write_json_line(&mut self.writer, &line)
            }
        }
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
