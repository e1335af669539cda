//! URL handling module for Purr-Links
//!
//! Scheme normalization for raw chat candidates, redirect `Location`
//! resolution, and host extraction for result lines.

mod domain;
mod normalize;

pub use domain::extract_host;
pub use normalize::{ensure_scheme, has_http_scheme, parse_candidate_url, resolve_location};
