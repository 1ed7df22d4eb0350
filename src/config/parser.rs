use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "API_KEY";

/// Environment variable consulted when no channel id is configured
pub const CHANNEL_ID_ENV: &str = "CHANNEL_ID";

/// Reads and parses a configuration file without validating it
///
/// Use this when further overrides (environment, command line) are applied
/// before validation.
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads and parses a configuration file from the given path
///
/// Missing credentials are filled in from the process environment before
/// the result is validated.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use comment_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Comments per video: {}", config.youtube.comments_limit);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut config = parse_config(path)?;
    apply_env_fallback(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Fills unset credentials from the environment
///
/// `lookup` resolves an environment variable name to its value. Values that
/// are already configured are never replaced, and empty variables are ignored.
pub fn apply_env_fallback<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if config.youtube.api_key.is_none() {
        config.youtube.api_key = non_empty(API_KEY_ENV);
    }
    if config.youtube.channel_id.is_none() {
        config.youtube.channel_id = non_empty(CHANNEL_ID_ENV);
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded with every harvest run so runs made with different
/// settings can be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Hex-encoded SHA-256 of an arbitrary configuration string
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
