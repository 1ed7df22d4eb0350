use crate::model::VideoId;
use chrono::{NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc};

/// Layout of `published_at` in the `youtube_comments` table (UTC, whole seconds)
pub const PUBLISHED_AT_DB_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One top-level comment thread, normalized for storage
///
/// Replies are never expanded. Records are immutable once built: the fields
/// are only reachable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    video_id: VideoId,
    author: String,
    text: String,
    like_count: u64,
    published_at: NaiveDateTime,
}

impl CommentRecord {
    /// Builds a record; `published_at` is UTC and truncated to whole seconds
    pub fn new(
        video_id: VideoId,
        author: impl Into<String>,
        text: impl Into<String>,
        like_count: u64,
        published_at: NaiveDateTime,
    ) -> Self {
        let published_at = published_at.with_nanosecond(0).unwrap_or(published_at);

        Self {
            video_id,
            author: author.into(),
            text: text.into(),
            like_count,
            published_at,
        }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn published_at(&self) -> NaiveDateTime {
        self.published_at
    }

    /// `published_at` as stored in SQLite
    pub fn published_at_db(&self) -> String {
        self.published_at.format(PUBLISHED_AT_DB_FORMAT).to_string()
    }

    /// `published_at` in RFC 3339 with a `Z` suffix, the shape the API returns
    pub fn published_at_rfc3339(&self) -> String {
        Utc.from_utc_datetime(&self.published_at)
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
