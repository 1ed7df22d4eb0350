//! Sink traits and error types
//!
//! A sink consumes the normalized comment batches produced by the harvester.
//! Two implementations exist: the SQLite table and the buffered CSV export.

use crate::model::CommentRecord;
use crate::storage::{RunTotals, StorageError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Sink used before begin()")]
    NotStarted,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for harvested comments
///
/// The harvester drives a sink through `begin`, any number of `store` calls
/// (one per video), and exactly one of `finish` or `abort`.
pub trait CommentSink {
    /// Prepares the sink for a run over `channel_id`
    fn begin(&mut self, channel_id: &str) -> OutputResult<()>;

    /// Accepts one video's batch of comments
    ///
    /// # Returns
    ///
    /// The number of records accepted
    fn store(&mut self, comments: &[CommentRecord]) -> OutputResult<usize>;

    /// Completes the run
    ///
    /// Buffered sinks write their output here.
    fn finish(&mut self, totals: &RunTotals) -> OutputResult<()>;

    /// Ends a run that could not complete
    fn abort(&mut self, totals: &RunTotals) -> OutputResult<()>;

    /// Human-readable description of where records go
    fn target(&self) -> String;
}
