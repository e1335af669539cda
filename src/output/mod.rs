//! Output module for delivering resolver results
//!
//! This module handles:
//! - The `ResultSink` trait resolver tasks report through
//! - The chat target and per-message context carried to each task
//! - A console sink for the command-line binary and a recording sink

mod console;
mod recording;
mod traits;

pub use console::ConsoleSink;
pub use recording::RecordingSink;
pub use traits::{ChatTarget, ResolutionContext, ResultSink};
