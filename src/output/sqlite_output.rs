//! SQLite-backed comment sink
//!
//! This sink appends every batch to the `youtube_comments` table and tracks
//! the run in `harvest_runs`.

use crate::model::CommentRecord;
use crate::output::traits::{CommentSink, OutputError, OutputResult};
use crate::storage::{RunTotals, SqliteStorage, Storage};

/// Sink writing straight into a [`SqliteStorage`]
///
/// The storage (and so the connection) is owned by the sink for the whole
/// run and released when the sink is dropped.
pub struct SqliteSink {
    storage: SqliteStorage,
    label: String,
    config_hash: String,
    run_id: Option<i64>,
}

impl SqliteSink {
    /// Creates a new SQLite sink
    ///
    /// # Arguments
    ///
    /// * `storage` - The opened database
    /// * `label` - Database location shown to the operator
    /// * `config_hash` - Hash of the configuration, recorded with the run
    pub fn new(
        storage: SqliteStorage,
        label: impl Into<String>,
        config_hash: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            label: label.into(),
            config_hash: config_hash.into(),
            run_id: None,
        }
    }

    /// Run created by `begin`, if any
    pub fn run_id(&self) -> Option<i64> {
        self.run_id
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Releases the sink and hands back the storage
    pub fn into_storage(self) -> SqliteStorage {
        self.storage
    }
}

impl CommentSink for SqliteSink {
    fn begin(&mut self, channel_id: &str) -> OutputResult<()> {
        let run_id = self.storage.create_run(channel_id, &self.config_hash)?;
        tracing::debug!("Created harvest run {}", run_id);
        self.run_id = Some(run_id);
        Ok(())
    }

    fn store(&mut self, comments: &[CommentRecord]) -> OutputResult<usize> {
        if self.run_id.is_none() {
            return Err(OutputError::NotStarted);
        }
        Ok(self.storage.insert_comments(comments)?)
    }

    fn finish(&mut self, totals: &RunTotals) -> OutputResult<()> {
        let run_id = self.run_id.ok_or(OutputError::NotStarted)?;
        self.storage.complete_run(run_id, totals)?;
        Ok(())
    }

    fn abort(&mut self, totals: &RunTotals) -> OutputResult<()> {
        if let Some(run_id) = self.run_id {
            self.storage.fail_run(run_id, totals)?;
        }
        Ok(())
    }

    fn target(&self) -> String {
        format!("database {}", self.label)
    }
}
