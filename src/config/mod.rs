//! Configuration module for Purr-Links
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use purr_links::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("purr-links.toml")).unwrap();
//! println!("Connect timeout: {}ms", config.resolver.connect_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, GiphyConfig, ResolverConfig, SpotifyConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
