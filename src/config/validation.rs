use crate::config::types::{Config, OutputConfig, OutputFormat, YouTubeConfig};
use crate::ConfigError;
use url::Url;

/// Largest `maxResults` the commentThreads endpoint accepts
pub const MAX_COMMENTS_LIMIT: u32 = 100;

/// Validates the entire configuration
///
/// Credentials are not checked here because the read-only modes
/// (`--stats`, `--export-summary`) never talk to the API; see
/// [`require_credentials`].
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_youtube_config(&config.youtube)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Returns the API key and channel id, failing if either is missing
pub fn require_credentials(config: &YouTubeConfig) -> Result<(&str, &str), ConfigError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::MissingValue("youtube.api-key (or the API_KEY variable)".to_string())
        })?;

    let channel_id = config
        .channel_id
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| {
            ConfigError::MissingValue("youtube.channel-id (or the CHANNEL_ID variable)".to_string())
        })?;

    Ok((api_key, channel_id))
}

/// Validates API access settings
fn validate_youtube_config(config: &YouTubeConfig) -> Result<(), ConfigError> {
    if config.comments_limit < 1 || config.comments_limit > MAX_COMMENTS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "comments_limit must be between 1 and {}, got {}",
            MAX_COMMENTS_LIMIT, config.comments_limit
        )));
    }

    let url = Url::parse(&config.api_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base_url '{}' must use http or https",
            config.api_base_url
        )));
    }

    if let Some(channel_id) = &config.channel_id {
        if channel_id.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "channel_id must not contain whitespace, got '{}'",
                channel_id
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.format {
        OutputFormat::Sqlite if config.database_path.is_empty() => Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        )),
        OutputFormat::Csv if config.csv_path.is_empty() => Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        )),
        _ => Ok(()),
    }
}
