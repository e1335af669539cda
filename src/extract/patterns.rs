//! Precompiled pattern families for link detection
//!
//! Compiled regexes are immutable, so one shared set serves every caller
//! without locking.

use regex::Regex;
use std::sync::OnceLock;

/// Bare or schemed web addresses anchored on a small set of suffixes and
/// well-known hosts. The token must start the message or follow whitespace,
/// may be wrapped in `(` or `[`, and the path stops at whitespace or a
/// closing bracket. Group 1 is the address.
const WEB_PATTERN: &str = r"(?i)(?:^|\s)\(?\[?((?:https?://)?(?:\w+\.)*(?:\w+\.(?:com|net|uk|edu)|www|is\.gd|bit\.ly|t\.co)(?::[0-9]+)?(?:/[^\s\])]*)?)";

/// Anything that starts with an explicit HTTP(S) scheme
const PROTOCOL_PATTERN: &str = r#"(?i)https?://[^\s\])"]+"#;

/// `spotify:` URIs. Group 1 is the full URI.
const SPOTIFY_PATTERN: &str = r"(?i)(?:^|\s)(spotify:[a-z0-9:]+)";

/// `gif:`/`giphy:` searches. Group 1 is a quoted phrase (quotes excluded),
/// group 2 a bare term.
const GIPHY_PATTERN: &str = r#"(?i)(?:^|\s)(?:gif|giphy):(?:"([^"]+)"|([a-z0-9:]+))"#;

/// The four pattern families scanned over every message
pub struct LinkPatterns {
    pub web: Regex,
    pub protocol: Regex,
    pub spotify: Regex,
    pub giphy: Regex,
}

impl LinkPatterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            web: Regex::new(WEB_PATTERN)?,
            protocol: Regex::new(PROTOCOL_PATTERN)?,
            spotify: Regex::new(SPOTIFY_PATTERN)?,
            giphy: Regex::new(GIPHY_PATTERN)?,
        })
    }
}

static PATTERNS: OnceLock<LinkPatterns> = OnceLock::new();

/// Returns the process-wide compiled patterns
pub fn patterns() -> &'static LinkPatterns {
    PATTERNS.get_or_init(|| LinkPatterns::compile().expect("valid regex"))
}
