//! Comment Harvest: YouTube channel comment collector
//!
//! This crate lists every video of a YouTube channel through the Data API v3,
//! fetches the top-level comment threads of each video, and stores the
//! normalized comments in SQLite or exports them to CSV.

pub mod config;
pub mod harvest;
pub mod model;
pub mod output;
pub mod storage;
pub mod youtube;

use thiserror::Error;

/// Main error type for Comment Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("YouTube API error: {0}")]
    Api(#[from] youtube::ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Missing required value: {0}")]
    MissingValue(String),
}

/// Result type alias for Comment Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{HarvestReport, Harvester, SkipPolicy};
pub use model::{CommentRecord, VideoId};
pub use youtube::YouTubeClient;
