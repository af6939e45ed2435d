//! Remote collaborator contracts
//!
//! The engine never talks to the network directly. It persists through these
//! traits, implemented over REST by `projectboard-api` and in memory by
//! `test_support::FakeBackend`.

use crate::error::RemoteError;
use crate::types::{NewStatus, NewTask, ProjectId, Status, StatusId, StatusUpdate, Task, TaskId};
use async_trait::async_trait;

/// Persists columns and their order
#[async_trait]
pub trait StatusService: Send + Sync {
    /// All statuses of a project, in whatever order the server returns them
    async fn list_statuses(&self, project: ProjectId) -> Result<Vec<Status>, RemoteError>;

    /// Create a status; the server appends it after the existing ones
    async fn create_status(&self, project: ProjectId, status: &NewStatus) -> Result<Status, RemoteError>;

    /// Persist a column order. The server assigns `order` from array position.
    async fn reorder_statuses(&self, project: ProjectId, order: &[StatusId]) -> Result<(), RemoteError>;

    async fn update_status(&self, update: &StatusUpdate) -> Result<(), RemoteError>;

    async fn delete_status(&self, status: StatusId) -> Result<(), RemoteError>;
}

/// Persists tasks
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, RemoteError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, RemoteError>;

    /// Move a task to another column. Idempotent.
    async fn update_task_status(&self, task: TaskId, status: StatusId) -> Result<(), RemoteError>;
}
