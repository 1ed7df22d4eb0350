//! Configuration module for Comment Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, with API credentials falling back to environment variables.
//!
//! # Example
//!
//! ```no_run
//! use comment_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing to: {}", config.output.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, OutputFormat, PipelineConfig, YouTubeConfig, DEFAULT_API_BASE_URL,
    DEFAULT_COMMENTS_LIMIT,
};

// Re-export parser functions
pub use parser::{
    apply_env_fallback, compute_config_hash, hash_content, load_config, parse_config, API_KEY_ENV,
    CHANNEL_ID_ENV,
};
pub use validation::{require_credentials, validate, MAX_COMMENTS_LIMIT};
