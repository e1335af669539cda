use super::size::human_readable_bytes;
use std::fmt;

/// The single line a resolver task delivers for one candidate
///
/// Silent failures have no variant; resolvers express them as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedResult {
    /// An HTML (or other textual) page and its title
    Title { host: String, title: String },

    /// A non-textual resource with its MIME type and, when advertised, size
    TypedResource {
        host: String,
        mime: String,
        size: Option<u64>,
    },

    /// The redirect chain did not settle within the hop limit
    Unresolved { host: String, hops: u32 },

    /// Embed URL of the first Giphy search hit
    Gif { embed_url: String },

    /// One-line description of a Spotify track
    Track { summary: String },
}

impl fmt::Display for ResolvedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title { host, title } => write!(f, "[{}] {}", host, title),
            Self::TypedResource {
                host,
                mime,
                size: Some(bytes),
            } => write!(f, "[{}] {} {}", host, mime, human_readable_bytes(*bytes)),
            Self::TypedResource {
                host,
                mime,
                size: None,
            } => write!(f, "[{}] {} (size unknown)", host, mime),
            Self::Unresolved { host, hops } => {
                write!(f, "[{}] (Unresolved after {} hops)", host, hops)
            }
            Self::Gif { embed_url } => write!(f, "{}", embed_url),
            Self::Track { summary } => write!(f, "{}", summary),
        }
    }
}
