use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Purr-Links
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub giphy: GiphyConfig,
    pub spotify: SpotifyConfig,
}

/// Web link resolution settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Connect timeout for each HEAD/GET (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Read timeout for each HEAD/GET and each body read (milliseconds)
    #[serde(rename = "read-timeout-ms")]
    pub read_timeout_ms: u64,

    /// Upper bound on the number of body bytes scanned for a title
    #[serde(rename = "max-title-bytes")]
    pub max_title_bytes: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl ResolverConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 2000,
            read_timeout_ms: 2000,
            max_title_bytes: 256 * 1024,
            user_agent: format!("purr-links/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Giphy search settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GiphyConfig {
    /// Whether `gif:`/`giphy:` candidates are resolved at all
    pub enabled: bool,

    /// Base URL of the Giphy API (no trailing path)
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// API key sent as the `api_key` query parameter
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Content rating filter
    pub rating: String,
}

impl Default for GiphyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "http://api.giphy.com".to_string(),
            // Giphy's published public beta key
            api_key: "dc6zaTOxFJmzC".to_string(),
            rating: "pg-13".to_string(),
        }
    }
}

/// Spotify lookup settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpotifyConfig {
    /// Whether `spotify:` candidates are resolved at all
    pub enabled: bool,

    /// Base URL of the lookup service
    #[serde(rename = "lookup-base")]
    pub lookup_base: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lookup_base: "http://ws.spotify.com".to_string(),
        }
    }
}
