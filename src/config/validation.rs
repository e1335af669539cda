use crate::config::types::{Config, GiphyConfig, ResolverConfig, SpotifyConfig};
use crate::ConfigError;
use url::Url;

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 60_000;
const MIN_TITLE_BYTES: u64 = 1024;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_resolver_config(&config.resolver)?;
    validate_giphy_config(&config.giphy)?;
    validate_spotify_config(&config.spotify)?;
    Ok(())
}

/// Validates web resolver configuration
fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    validate_timeout("connect-timeout-ms", config.connect_timeout_ms)?;
    validate_timeout("read-timeout-ms", config.read_timeout_ms)?;

    if config.max_title_bytes < MIN_TITLE_BYTES {
        return Err(ConfigError::Validation(format!(
            "max-title-bytes must be >= {}, got {}",
            MIN_TITLE_BYTES, config.max_title_bytes
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(name: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between {} and {}, got {}",
            name, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, value
        )));
    }
    Ok(())
}

/// Validates Giphy configuration
fn validate_giphy_config(config: &GiphyConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    validate_base_url("giphy api-base", &config.api_base)?;

    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "giphy api-key cannot be empty while giphy is enabled".to_string(),
        ));
    }

    Ok(())
}

/// Validates Spotify configuration
fn validate_spotify_config(config: &SpotifyConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    validate_base_url("spotify lookup-base", &config.lookup_base)
}

/// Validates that a base URL parses and uses HTTP or HTTPS
fn validate_base_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidUrl(format!("{} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
