//! `publishedAt` normalization
//!
//! The API documents `publishedAt` as an RFC 3339 date-time
//! (`2024-01-01T00:00:00Z`). Anything else is rejected instead of being
//! guessed at.

use crate::youtube::errors::ApiError;
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Parses an API timestamp into a UTC value with whole-second precision
pub fn parse_published_at(raw: &str) -> Result<NaiveDateTime, ApiError> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| ApiError::Parse(format!("invalid publishedAt '{}': {}", raw, e)))?;

    let utc = parsed.with_timezone(&Utc).naive_utc();
    Ok(utc.with_nanosecond(0).unwrap_or(utc))
}
