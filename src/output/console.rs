use super::traits::{ChatTarget, ResultSink};
use std::io::Write;

/// Prints each result to stdout as `<target> <text>`
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ResultSink for ConsoleSink {
    fn message(&self, target: &ChatTarget, text: &str) {
        // One locked write per line keeps concurrent results from interleaving
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{} {}", target, text) {
            tracing::warn!("Failed to write result: {}", e);
        }
    }
}
