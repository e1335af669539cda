//! Candidate resolvers
//!
//! This module turns one link candidate into at most one line of output:
//! - Web links: manual redirect chasing, content classification, title or
//!   size extraction
//! - Spotify URIs: track metadata lookup
//! - Giphy terms: first search hit
//!
//! Every resolver reports expected network trouble as `Ok(None)` and only
//! returns an error for failures nobody anticipated.

mod entities;
mod fetcher;
mod giphy;
mod outcome;
mod size;
mod spotify;
mod title;
mod web;

pub use entities::decode_entities;
pub use fetcher::{
    build_http_client, classify_error, exchange_deadline, read_body, send_bounded, FailureKind,
};
pub use giphy::GiphyResolver;
pub use outcome::ResolvedResult;
pub use size::human_readable_bytes;
pub use spotify::SpotifyResolver;
pub use title::{scan_title, ScanStep, TitleScanner, FALLBACK_TITLE};
pub use web::{WebLinkResolver, MAX_HOPS};
