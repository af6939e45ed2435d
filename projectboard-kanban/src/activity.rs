//! Bounded log of the board's remote mutations

use projectboard_operations::LogEntry;
use std::collections::VecDeque;

/// Entries kept before the oldest are dropped
pub const ACTIVITY_LIMIT: usize = 200;

/// Most recent operation log entries, newest first
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    limit: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_limit(ACTIVITY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    /// Entries, newest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}
