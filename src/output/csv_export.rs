//! CSV comment export
//!
//! Records are buffered for the whole run and written in one go when the
//! harvest finishes, so an aborted run leaves no partial file behind.

use crate::model::CommentRecord;
use crate::output::traits::{CommentSink, OutputResult};
use crate::storage::RunTotals;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Column headers of the export
pub const CSV_HEADERS: [&str; 5] = ["Video ID", "Author", "Comment", "Likes", "Published At"];

/// UTF-8 byte-order mark written ahead of the header row
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Sink buffering every record and writing a CSV file on `finish`
pub struct CsvSink {
    path: PathBuf,
    buffer: Vec<CommentRecord>,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            buffer: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records accepted so far and not yet written
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

impl CommentSink for CsvSink {
    fn begin(&mut self, channel_id: &str) -> OutputResult<()> {
        tracing::debug!(
            "Buffering comments of {} for {}",
            channel_id,
            self.path.display()
        );
        self.buffer.clear();
        Ok(())
    }

    fn store(&mut self, comments: &[CommentRecord]) -> OutputResult<usize> {
        self.buffer.extend_from_slice(comments);
        Ok(comments.len())
    }

    fn finish(&mut self, _totals: &RunTotals) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(UTF8_BOM)?;
        write_csv(&mut writer, &self.buffer)?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} comments to {}",
            self.buffer.len(),
            self.path.display()
        );
        self.buffer.clear();
        Ok(())
    }

    fn abort(&mut self, _totals: &RunTotals) -> OutputResult<()> {
        if !self.buffer.is_empty() {
            tracing::warn!(
                "Discarding {} buffered comments; {} not written",
                self.buffer.len(),
                self.path.display()
            );
        }
        self.buffer.clear();
        Ok(())
    }

    fn target(&self) -> String {
        format!("CSV file {}", self.path.display())
    }
}

/// Writes the header and one row per record to `writer`
pub fn write_csv<W: Write>(writer: W, records: &[CommentRecord]) -> OutputResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;

    for record in records {
        let likes = record.like_count().to_string();
        let published_at = record.published_at_rfc3339();
        csv_writer.write_record([
            record.video_id().as_str(),
            record.author(),
            record.text(),
            likes.as_str(),
            published_at.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
