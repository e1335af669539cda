use super::traits::{ChatTarget, ResultSink};
use std::sync::{Mutex, MutexGuard};

/// Sink that keeps every delivered line in memory
///
/// Useful for embedding the resolver in another process and for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<(ChatTarget, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far, in delivery order
    pub fn messages(&self) -> Vec<(ChatTarget, String)> {
        self.lock().clone()
    }

    /// Just the delivered texts, in delivery order
    pub fn texts(&self) -> Vec<String> {
        self.lock().iter().map(|(_, text)| text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic inside another sink call must not hide later deliveries
    fn lock(&self) -> MutexGuard<'_, Vec<(ChatTarget, String)>> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ResultSink for RecordingSink {
    fn message(&self, target: &ChatTarget, text: &str) {
        self.lock().push((target.clone(), text.to_string()));
    }
}
