//! Activity records for remote mutations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use ulid::Ulid;

/// One remote mutation as it was sent and answered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Sortable id, unique per entry
    pub id: Ulid,

    /// When the call returned
    pub completed_at: DateTime<Utc>,

    /// Op string such as "reorder statuses"
    pub op: String,

    /// The request parameters
    pub input: Value,

    /// The response, or `{"error": "<message>"}`
    pub output: Value,

    /// Round trip time in milliseconds
    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(op: impl Into<String>, input: Value, output: Value, elapsed: Duration) -> Self {
        Self {
            id: Ulid::new(),
            completed_at: Utc::now(),
            op: op.into(),
            input,
            output,
            duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Entry for a call the backend refused or never answered
    pub fn failure(op: impl Into<String>, input: Value, message: impl Into<String>, elapsed: Duration) -> Self {
        Self::new(op, input, json!({ "error": message.into() }), elapsed)
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }

    /// The recorded failure message, if the call failed
    pub fn error_message(&self) -> Option<&str> {
        self.output.get("error").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_entry() {
        let entry = LogEntry::new(
            "reorder statuses",
            json!({"order": [3, 1, 2]}),
            Value::Null,
            Duration::from_millis(12),
        );

        assert_eq!(entry.duration_ms, 12);
        assert_eq!(entry.id.to_string().len(), 26);
        assert!(!entry.is_error());
    }

    #[test]
    fn test_failure_entry() {
        let entry = LogEntry::failure(
            "update task status",
            json!({"task": 4}),
            "server error 500: boom",
            Duration::ZERO,
        );
        assert!(entry.is_error());
        assert_eq!(entry.error_message(), Some("server error 500: boom"));
    }

    #[test]
    fn test_entries_sort_by_id() {
        let first = LogEntry::new("create task", Value::Null, Value::Null, Duration::ZERO);
        let second = LogEntry::new("create task", Value::Null, Value::Null, Duration::ZERO);
        assert!(first.id <= second.id);
    }
}
