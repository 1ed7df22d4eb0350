//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Comment Harvest database.

/// SQL schema for the database
///
/// `youtube_comments` has no uniqueness constraint beyond the surrogate id:
/// rerunning a harvest appends the same comments again.
pub const SCHEMA_SQL: &str = r#"
-- Track harvest runs
CREATE TABLE IF NOT EXISTS harvest_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    channel_id TEXT NOT NULL,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    videos_listed INTEGER NOT NULL DEFAULT 0,
    comments_stored INTEGER NOT NULL DEFAULT 0,
    failures INTEGER NOT NULL DEFAULT 0
);

-- One row per top-level comment thread
CREATE TABLE IF NOT EXISTS youtube_comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    video_id TEXT NOT NULL,
    author TEXT NOT NULL,
    comment TEXT NOT NULL,
    likes INTEGER NOT NULL,
    published_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_youtube_comments_video ON youtube_comments(video_id);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
