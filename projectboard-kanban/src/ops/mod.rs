//! Remote board operations
//!
//! Each remote interaction is a struct whose fields are its parameters.
//! Mutations come back as `ExecutionResult::Logged` with an activity entry;
//! reads come back unlogged.

mod status;
mod task;

pub use status::{CreateStatus, ListStatuses, ReorderStatuses};
pub use task::{CreateTask, ListTasks, UpdateTaskStatus};

use serde::Serialize;
use serde_json::Value;

/// JSON form of an operation for its log entry
fn input_of<T: Serialize>(op: &T) -> Value {
    serde_json::to_value(op).unwrap_or(Value::Null)
}
