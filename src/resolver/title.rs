//! Bounded line scanner for HTML `<title>` text
//!
//! This is deliberately not an HTML parser. It looks for the literal tags
//! `<title>`/`<TITLE>` and `</title>`/`</TITLE>` line by line and gives up
//! at the first `</head>` or `<body>` (either case) seen before a title.
//! Mixed-case tags such as `<Title>` are not recognised.
//!
//! When a title spans several lines the lines are concatenated exactly as
//! read, with no separator between them.

use super::entities::decode_entities;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Title reported when the document has none
pub const FALLBACK_TITLE: &str = "[No Title Set]";

const OPEN_TAGS: [&str; 2] = ["<title>", "<TITLE>"];
const CLOSE_TAGS: [&str; 2] = ["</title>", "</TITLE>"];
const BOUNDARY_TAGS: [&str; 4] = ["</head>", "<body>", "</HEAD>", "<BODY>"];

/// Whether the scanner wants more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    Continue,
    Done,
}

/// Incremental title extractor fed one line at a time
#[derive(Debug, Default)]
pub struct TitleScanner {
    /// Accumulated title text; `None` until an opening tag is seen
    title: Option<String>,
    done: bool,
}

impl TitleScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (without its line terminator)
    pub fn feed_line(&mut self, line: &str) -> ScanStep {
        if self.done {
            return ScanStep::Done;
        }

        let mut rest = line;
        if let Some((idx, len)) = find_first(line, &OPEN_TAGS) {
            rest = &line[idx + len..];
            // A later opening tag restarts the title
            self.title = Some(String::new());
        }

        if let Some(title) = self.title.as_mut() {
            if let Some((idx, _)) = find_first(rest, &CLOSE_TAGS) {
                title.push_str(&rest[..idx]);
                return self.stop();
            }
        }

        if BOUNDARY_TAGS.iter().any(|tag| rest.contains(tag)) {
            return self.stop();
        }

        if let Some(title) = self.title.as_mut() {
            title.push_str(rest);
        }

        ScanStep::Continue
    }

    /// Returns true once the scanner has stopped consuming input
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Produces the final title: whitespace trimmed and collapsed, entities
    /// decoded, or [`FALLBACK_TITLE`] if no opening tag was seen
    pub fn finish(self) -> String {
        match self.title {
            Some(raw) => decode_entities(&collapse_whitespace(&raw)),
            None => FALLBACK_TITLE.to_string(),
        }
    }

    fn stop(&mut self) -> ScanStep {
        self.done = true;
        ScanStep::Done
    }
}

/// Finds the earliest occurrence of any of `tags`, returning (index, tag length)
fn find_first(haystack: &str, tags: &[&str]) -> Option<(usize, usize)> {
    tags.iter()
        .filter_map(|tag| haystack.find(tag).map(|idx| (idx, tag.len())))
        .min_by_key(|(idx, _)| *idx)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts a title from the first `max_bytes` of a text stream
///
/// Each line read is bounded by `read_timeout`; a stalled stream surfaces as
/// an [`io::ErrorKind::TimedOut`] error. Bytes that are not valid UTF-8 are
/// replaced rather than rejected.
///
/// # Arguments
///
/// * `reader` - The response body
/// * `max_bytes` - Maximum number of bytes consumed from `reader`
/// * `read_timeout` - Maximum wait for each line
///
/// # Returns
///
/// * `Ok(String)` - The title, or [`FALLBACK_TITLE`]
/// * `Err(io::Error)` - The stream failed or stalled
pub async fn scan_title<R>(reader: R, max_bytes: u64, read_timeout: Duration) -> io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut reader = reader.take(max_bytes);
    let mut scanner = TitleScanner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = match tokio::time::timeout(read_timeout, reader.read_until(b'\n', &mut buf)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "timed out reading response body",
                ))
            }
        };

        if read == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c| c == '\n' || c == '\r');
        if scanner.feed_line(line) == ScanStep::Done {
            break;
        }
    }

    Ok(scanner.finish())
}
