//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::model::{CommentRecord, VideoId};
use crate::storage::{RunRecord, RunTotals};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The harvester owns exactly one storage handle for a run and uses it
/// sequentially, so methods take `&mut self` for writes and no locking is
/// involved.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new harvest run in the `running` state
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, channel_id: &str, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed and records its totals
    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    /// Marks a run as failed and records whatever totals were reached
    fn fail_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()>;

    // ===== Comments =====

    /// Appends a batch of comments inside a single transaction
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    fn insert_comments(&mut self, comments: &[CommentRecord]) -> StorageResult<usize>;

    /// Reads back every stored comment of a video, in insertion order
    fn get_comments_for_video(&self, video_id: &VideoId) -> StorageResult<Vec<CommentRecord>>;

    // ===== Statistics =====

    /// Total number of stored comment rows
    fn count_comments(&self) -> StorageResult<u64>;

    /// Number of distinct videos with at least one stored comment
    fn count_videos(&self) -> StorageResult<u64>;

    /// Number of recorded harvest runs
    fn count_runs(&self) -> StorageResult<u64>;

    /// Authors with the most stored comments, descending
    fn top_authors(&self, limit: usize) -> StorageResult<Vec<(String, u64)>>;

    /// Videos with the most stored comments, descending
    fn top_videos(&self, limit: usize) -> StorageResult<Vec<(VideoId, u64)>>;
}
