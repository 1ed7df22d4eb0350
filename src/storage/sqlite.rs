//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::model::{CommentRecord, VideoId, PUBLISHED_AT_DB_FORMAT};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus, RunTotals};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, started_at, finished_at, channel_id, config_hash, status,
     videos_listed, comments_stored, failures";

/// SQLite storage backend
///
/// Owns the single connection used for a whole harvest. The connection is
/// closed when the value is dropped.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        totals: &RunTotals,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE harvest_runs SET status = ?1, finished_at = ?2, videos_listed = ?3,
             comments_stored = ?4, failures = ?5 WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                to_db_int(totals.videos_listed)?,
                to_db_int(totals.comments_stored)?,
                to_db_int(totals.failures)?,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn count(&self, sql: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, channel_id: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO harvest_runs (started_at, channel_id, config_hash, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                now,
                channel_id,
                config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM harvest_runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!(
            "SELECT {} FROM harvest_runs ORDER BY id DESC LIMIT 1",
            RUN_COLUMNS
        );
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Completed, totals)
    }

    fn fail_run(&mut self, run_id: i64, totals: &RunTotals) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Failed, totals)
    }

    // ===== Comments =====

    fn insert_comments(&mut self, comments: &[CommentRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO youtube_comments (video_id, author, comment, likes, published_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for comment in comments {
                stmt.execute(params![
                    comment.video_id().as_str(),
                    comment.author(),
                    comment.text(),
                    to_db_int(comment.like_count())?,
                    comment.published_at_db(),
                ])?;
            }
        }
        tx.commit()?;

        Ok(comments.len())
    }

    fn get_comments_for_video(&self, video_id: &VideoId) -> StorageResult<Vec<CommentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT author, comment, likes, published_at FROM youtube_comments
             WHERE video_id = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![video_id.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(author, text, likes, published_at)| {
                let published_at =
                    NaiveDateTime::parse_from_str(&published_at, PUBLISHED_AT_DB_FORMAT).map_err(
                        |e| {
                            StorageError::Serialization(format!(
                                "bad published_at '{}': {}",
                                published_at, e
                            ))
                        },
                    )?;
                let likes = u64::try_from(likes).map_err(|_| {
                    StorageError::Serialization(format!("negative like count {}", likes))
                })?;

                Ok(CommentRecord::new(
                    video_id.clone(),
                    author,
                    text,
                    likes,
                    published_at,
                ))
            })
            .collect()
    }

    // ===== Statistics =====

    fn count_comments(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM youtube_comments")
    }

    fn count_videos(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(DISTINCT video_id) FROM youtube_comments")
    }

    fn count_runs(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM harvest_runs")
    }

    fn top_authors(&self, limit: usize) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT author, COUNT(*) AS n FROM youtube_comments
             GROUP BY author ORDER BY n DESC, author LIMIT ?1",
        )?;

        let authors = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(authors)
    }

    fn top_videos(&self, limit: usize) -> StorageResult<Vec<(VideoId, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT video_id, COUNT(*) AS n FROM youtube_comments
             GROUP BY video_id ORDER BY n DESC, video_id LIMIT ?1",
        )?;

        let videos = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    VideoId::new(row.get::<_, String>(0)?),
                    row.get::<_, i64>(1)? as u64,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(videos)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        channel_id: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
        totals: RunTotals {
            videos_listed: row.get::<_, i64>(6)? as u64,
            comments_stored: row.get::<_, i64>(7)? as u64,
            failures: row.get::<_, i64>(8)? as u64,
        },
    })
}

fn to_db_int(value: u64) -> StorageResult<i64> {
    i64::try_from(value)
        .map_err(|_| StorageError::Serialization(format!("{} does not fit in INTEGER", value)))
}
