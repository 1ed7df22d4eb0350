use crate::harvest::SkipPolicy;
use serde::Deserialize;
use std::fmt;

/// Default base URL of the YouTube Data API v3
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Default number of comment threads requested per video
pub const DEFAULT_COMMENTS_LIMIT: u32 = 10;

/// Main configuration structure for Comment Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// YouTube Data API access configuration
#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    /// API key; falls back to the `API_KEY` environment variable
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Channel to harvest; falls back to the `CHANNEL_ID` environment variable
    #[serde(rename = "channel-id", default)]
    pub channel_id: Option<String>,

    /// Base URL of the Data API
    #[serde(rename = "api-base-url", default = "default_api_base_url")]
    pub api_base_url: String,

    /// Maximum number of comment threads read per video
    #[serde(rename = "comments-limit", default = "default_comments_limit")]
    pub comments_limit: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: None,
            api_base_url: default_api_base_url(),
            comments_limit: default_comments_limit(),
        }
    }
}

/// Where harvested comments end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Append rows to the SQLite `youtube_comments` table
    #[default]
    Sqlite,
    /// Buffer everything and write a single CSV file at the end
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Selected sink
    #[serde(default)]
    pub format: OutputFormat,

    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Path to the CSV export file
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            database_path: default_database_path(),
            csv_path: default_csv_path(),
        }
    }
}

/// Pipeline behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(rename = "skip-policy", default)]
    pub skip_policy: SkipPolicy,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_comments_limit() -> u32 {
    DEFAULT_COMMENTS_LIMIT
}

fn default_database_path() -> String {
    "youtube_comments.db".to_string()
}

fn default_csv_path() -> String {
    "youtube_channel_comments.csv".to_string()
}
