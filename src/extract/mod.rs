//! Link detection for chat messages
//!
//! This module scans raw message text for things worth resolving:
//! - Web addresses (bare, bracketed, or with an explicit scheme)
//! - `spotify:` URIs
//! - `gif:` / `giphy:` search terms, bare or double-quoted
//!
//! All matches are merged into one ordered, duplicate-free set so the same
//! message always yields the same candidates in the same order.

mod candidate;
mod patterns;

pub use candidate::{CandidateKind, LinkCandidate};
pub use patterns::{patterns, LinkPatterns};

use std::collections::BTreeSet;

/// Finds every link candidate in a chat message
///
/// The four pattern families are scanned independently over the whole
/// message. Identical matches collapse to one candidate; the result is
/// sorted by candidate text, not by position in the message.
///
/// # Arguments
///
/// * `message` - The raw chat message text
///
/// # Returns
///
/// The ordered set of candidates (empty when nothing matched)
///
/// # Example
///
/// ```
/// use purr_links::extract_candidates;
///
/// let found: Vec<String> = extract_candidates("google.com or bing.com")
///     .iter()
///     .map(|c| c.raw().to_string())
///     .collect();
/// assert_eq!(found, vec!["bing.com", "google.com"]);
/// ```
pub fn extract_candidates(message: &str) -> BTreeSet<LinkCandidate> {
    let patterns = patterns();
    let mut found = BTreeSet::new();

    for caps in patterns.web.captures_iter(message) {
        if let Some(m) = caps.get(1) {
            found.insert(LinkCandidate::new(CandidateKind::Web, m.as_str()));
        }
    }

    for m in patterns.protocol.find_iter(message) {
        found.insert(LinkCandidate::new(CandidateKind::Web, m.as_str()));
    }

    for caps in patterns.spotify.captures_iter(message) {
        if let Some(m) = caps.get(1) {
            found.insert(LinkCandidate::new(CandidateKind::SpotifyUri, m.as_str()));
        }
    }

    for caps in patterns.giphy.captures_iter(message) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            found.insert(LinkCandidate::new(CandidateKind::GiphySearch, m.as_str()));
        }
    }

    found
}
