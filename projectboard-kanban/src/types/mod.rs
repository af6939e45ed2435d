//! Core types for the board engine

mod ids;
mod status;
mod task;
pub mod timestamp;

// Re-export all types
pub use ids::{ProjectId, StatusId, TaskId, UserId};
pub use status::{NewStatus, Status, StatusUpdate, DEFAULT_STATUS_COLOR};
pub use task::{NewTask, Priority, Task, TaskAssignee, User};
