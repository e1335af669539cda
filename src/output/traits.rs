//! Result sink trait and delivery context
//!
//! This module defines the trait interface through which resolver tasks hand
//! their single line of output back to the chat layer, and the context that
//! travels with each candidate.

use std::fmt;

/// Opaque chat destination (a channel or a user) that results are sent to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatTarget(String);

impl ChatTarget {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatTarget {
    fn from(target: &str) -> Self {
        Self::new(target)
    }
}

impl From<String> for ChatTarget {
    fn from(target: String) -> Self {
        Self(target)
    }
}

/// Where the results of one message should go
///
/// Supplied by the caller alongside the message text and carried unchanged
/// into every resolver task spawned for that message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionContext {
    pub target: ChatTarget,
}

impl ResolutionContext {
    pub fn new(target: impl Into<ChatTarget>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

/// Trait for delivering resolver output to a chat destination
///
/// Implementations are shared by every resolver task and must tolerate
/// concurrent calls. Delivery is fire-and-forget: nothing is returned.
pub trait ResultSink: Send + Sync {
    /// Delivers one line of text to `target`
    fn message(&self, target: &ChatTarget, text: &str);
}
