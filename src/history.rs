//! Bounded in-memory FIFO of received messages.

use chrono::Local;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;

/// One recorded inbound message.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub message: Value,
}

/// Mutex-protected ring buffer, newest entry first.
pub struct HistoryRing {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Insert `message` at the head, evicting the oldest entry once over
    /// capacity.
    pub fn push(&self, message: Value) {
        let mut entries = self.entries.lock();
        entries.push_front(HistoryEntry {
            timestamp: Local::now().to_rfc3339(),
            message,
        });
        while entries.len() > self.capacity {
            entries.pop_back();
        }
    }

    /// The first `limit` entries (newest first).
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.lock().iter().take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
