//! Outcome of running an operation against the backend

use crate::LogEntry;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::time::Instant;

/// What an operation produced, and whether it belongs in the activity log.
///
/// Mutations are always logged, including the failed ones, so the activity
/// view shows what was attempted. Reads are never logged.
pub enum ExecutionResult<T, E> {
    /// A mutation the backend accepted
    Logged { value: T, log_entry: LogEntry },
    /// A read that succeeded
    Unlogged { value: T },
    /// A call that failed. Failed reads carry no entry.
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Wrap the result of a mutation that was sent at `started`.
    ///
    /// The entry's output is the serialized value, or `{"error": "<message>"}`.
    pub fn logged(op: impl Into<String>, input: Value, started: Instant, result: Result<T, E>) -> Self
    where
        T: Serialize,
        E: Display,
    {
        let elapsed = started.elapsed();
        match result {
            Ok(value) => {
                let output = serde_json::to_value(&value).unwrap_or(Value::Null);
                Self::Logged {
                    log_entry: LogEntry::new(op, input, output, elapsed),
                    value,
                }
            }
            Err(error) => {
                let log_entry = LogEntry::failure(op, input, error.to_string(), elapsed);
                Self::Failed {
                    error,
                    log_entry: Some(log_entry),
                }
            }
        }
    }

    /// Wrap the result of a read
    pub fn unlogged(result: Result<T, E>) -> Self {
        result.map_or_else(
            |error| Self::Failed {
                error,
                log_entry: None,
            },
            |value| Self::Unlogged { value },
        )
    }

    /// Drop the log entry and keep the outcome
    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }

    /// Separate the outcome from the entry to record
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Whether this result carries an activity entry
    pub fn should_log(&self) -> bool {
        match self {
            Self::Logged { .. } => true,
            Self::Unlogged { .. } => false,
            Self::Failed { log_entry, .. } => log_entry.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_logged_success_records_output() {
        let result: ExecutionResult<u32, String> =
            ExecutionResult::logged("create status", json!({"name": "Review"}), Instant::now(), Ok(7));

        assert!(result.should_log());
        let (value, entry) = result.split();
        assert_eq!(value, Ok(7));
        let entry = entry.unwrap();
        assert_eq!(entry.op, "create status");
        assert_eq!(entry.output, json!(7));
    }

    #[test]
    fn test_logged_failure_records_error() {
        let result: ExecutionResult<(), String> = ExecutionResult::logged(
            "update task status",
            Value::Null,
            Instant::now(),
            Err("server returned 500".to_string()),
        );

        assert!(result.should_log());
        let (value, entry) = result.split();
        assert!(value.is_err());
        assert_eq!(entry.unwrap().error_message(), Some("server returned 500"));
    }

    #[test]
    fn test_unlogged_read() {
        let ok: ExecutionResult<Vec<u8>, String> = ExecutionResult::unlogged(Ok(vec![1, 2]));
        assert!(!ok.should_log());
        assert_eq!(ok.into_result(), Ok(vec![1, 2]));

        let failed: ExecutionResult<(), String> = ExecutionResult::unlogged(Err("timeout".to_string()));
        assert!(!failed.should_log());
        assert_eq!(failed.into_result(), Err("timeout".to_string()));
    }
}
