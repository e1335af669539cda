use std::cmp::Ordering;
use std::fmt;

/// Which resolver a candidate is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CandidateKind {
    /// A web address, with or without an `http(s)://` scheme
    Web,
    /// A `spotify:` URI
    SpotifyUri,
    /// A Giphy search term (`gif:` / `giphy:` prefix already removed)
    GiphySearch,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Web => "web",
            Self::SpotifyUri => "spotify",
            Self::GiphySearch => "giphy",
        };
        write!(f, "{}", name)
    }
}

/// A single link-like reference found in a chat message
///
/// Candidates are immutable and consumed exactly once by a resolver task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LinkCandidate {
    kind: CandidateKind,
    raw: String,
}

impl LinkCandidate {
    pub fn new(kind: CandidateKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    pub fn kind(&self) -> CandidateKind {
        self.kind
    }

    /// The matched text: a URL for `Web`, the full URI for `SpotifyUri`,
    /// and the unquoted search phrase for `GiphySearch`
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

// Candidates sort by their text first so extraction output follows natural
// string order; the kind only breaks ties between identical texts.
impl Ord for LinkCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw
            .cmp(&other.raw)
            .then_with(|| self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for LinkCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for LinkCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.raw)
    }
}
