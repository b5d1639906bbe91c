use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// A single record of message activity: who sent what, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub sender: String,
    pub content: String,
    pub timestamp: i64,
}

/// Append-only, in-memory log of message activity.
///
/// Entries keep their insertion order; nothing is ever reordered, mutated, or
/// deleted. Appends take the write side of the lock, queries the read side.
#[derive(Debug)]
pub struct MessageStore {
    entries: RwLock<Vec<LogEntry>>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::with_capacity(100)),
        }
    }

    /// Appends an entry to the end of the log. Never fails.
    pub fn append(&self, entry: LogEntry) {
        let mut entries = self.entries.write().unwrap();
        entries.push(entry);
    }

    /// Returns entries matching the sender filter, in insertion order.
    ///
    /// An empty filter returns the whole log. The result is a copy: mutating
    /// it, or appending afterwards, never affects what was returned.
    pub fn query(&self, sender: &str) -> Vec<LogEntry> {
        let entries = self.entries.read().unwrap();
        if sender.is_empty() {
            return entries.clone();
        }
        entries.iter().filter(|e| e.sender == sender).cloned().collect()
    }

    /// Number of entries appended so far.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
