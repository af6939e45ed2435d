//! Task (card) operations

use super::input_of;
use crate::context::BoardContext;
use crate::error::KanbanError;
use crate::types::{NewTask, ProjectId, StatusId, Task, TaskId};
use projectboard_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// List a project's tasks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListTasks {
    pub project: ProjectId,
}

impl ListTasks {
    pub fn new(project: impl Into<ProjectId>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

impl Operation for ListTasks {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "tasks"
    }
    fn description(&self) -> &'static str {
        "List all tasks of a project"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for ListTasks {
    type Output = Vec<Task>;

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Vec<Task>, KanbanError> {
        let result = ctx
            .tasks()
            .list_tasks(self.project)
            .await
            .map_err(KanbanError::from);
        ExecutionResult::unlogged(result)
    }
}

/// Create a task
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTask {
    pub task: NewTask,
}

impl CreateTask {
    pub fn new(task: NewTask) -> Self {
        Self { task }
    }
}

impl Operation for CreateTask {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Create a task, optionally assigned and placed in a column"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for CreateTask {
    type Output = Task;

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Task, KanbanError> {
        let started = Instant::now();
        let result = async {
            if self.task.title.trim().is_empty() {
                return Err(KanbanError::missing_field("title"));
            }
            Ok(ctx.tasks().create_task(&self.task).await?)
        }
        .await;
        ExecutionResult::logged(self.op_string(), input_of(self), started, result)
    }
}

/// Move a task to another column
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTaskStatus {
    pub task: TaskId,
    pub status: StatusId,
}

impl UpdateTaskStatus {
    pub fn new(task: impl Into<TaskId>, status: impl Into<StatusId>) -> Self {
        Self {
            task: task.into(),
            status: status.into(),
        }
    }
}

impl Operation for UpdateTaskStatus {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "task status"
    }
    fn description(&self) -> &'static str {
        "Move a task to another column"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for UpdateTaskStatus {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<(), KanbanError> {
        let started = Instant::now();
        let result = ctx
            .tasks()
            .update_task_status(self.task, self.status)
            .await
            .map_err(KanbanError::from);
        ExecutionResult::logged(self.op_string(), input_of(self), started, result)
    }
}
