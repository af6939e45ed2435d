//! # ProjectBoard Operations
//!
//! This crate provides the `Operation` trait for describing remote board
//! operations and the `Execute` trait for running them against a context.
//! Operations are structs where the fields ARE the parameters.
//!
//! ## Example
//!
//! ```ignore
//! use projectboard_operations::*;
//!
//! #[derive(Debug, Serialize)]
//! pub struct ReorderStatuses {
//!     pub project: ProjectId,
//!     pub order: Vec<StatusId>,
//! }
//!
//! impl Operation for ReorderStatuses {
//!     fn verb(&self) -> &'static str { "reorder" }
//!     fn noun(&self) -> &'static str { "statuses" }
//!     fn description(&self) -> &'static str { "Persist a new column order" }
//! }
//!
//! #[async_trait]
//! impl Execute<BoardContext, KanbanError> for ReorderStatuses {
//!     type Output = ();
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<(), KanbanError> {
//!         // implementation returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};

// Re-export for use in implementations
pub use async_trait::async_trait;
