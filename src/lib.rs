//! Purr-Links: link detection and asynchronous resolution for a chat bot
//!
//! This crate scans free-form chat text for things that look like links,
//! resolves each one on its own task (redirect chasing, content
//! classification, title and size extraction) and reports a single line back
//! to the chat target the message came from.

pub mod config;
pub mod dispatch;
pub mod extract;
pub mod output;
pub mod resolver;
pub mod url;

use thiserror::Error;

/// Main error type for Purr-Links operations
#[derive(Debug, Error)]
pub enum PurrError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Hard failures of a single resolver task
///
/// Anything that ends up here is logged by the dispatcher's supervision
/// boundary and the task is discarded. Expected network trouble (DNS, TLS,
/// timeouts, refused connections) never becomes a `ResolveError`; resolvers
/// report those as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid candidate URL {raw}: {source}")]
    InvalidUrl { raw: String, source: UrlError },

    #[error("Cannot follow redirect from {url} to {location}: {source}")]
    InvalidLocation {
        url: String,
        location: String,
        source: UrlError,
    },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        source: std::io::Error,
    },
}

/// Result type alias for Purr-Links operations
pub type Result<T> = std::result::Result<T, PurrError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for a single resolution
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::ResolverDispatcher;
pub use extract::{extract_candidates, CandidateKind, LinkCandidate};
pub use output::{ChatTarget, ResolutionContext, ResultSink};
pub use resolver::{ResolvedResult, WebLinkResolver};
