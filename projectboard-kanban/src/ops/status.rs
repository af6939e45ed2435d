//! Status (column) operations

use super::input_of;
use crate::context::BoardContext;
use crate::error::KanbanError;
use crate::types::{NewStatus, ProjectId, Status, StatusId};
use projectboard_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// List a project's statuses, sorted by `order`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListStatuses {
    pub project: ProjectId,
}

impl ListStatuses {
    pub fn new(project: impl Into<ProjectId>) -> Self {
        Self {
            project: project.into(),
        }
    }
}

impl Operation for ListStatuses {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "statuses"
    }
    fn description(&self) -> &'static str {
        "List the columns of a project in display order"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for ListStatuses {
    type Output = Vec<Status>;

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Vec<Status>, KanbanError> {
        let result = ctx
            .statuses()
            .list_statuses(self.project)
            .await
            .map(|mut statuses| {
                statuses.sort_by_key(|s| s.order);
                statuses
            })
            .map_err(KanbanError::from);
        ExecutionResult::unlogged(result)
    }
}

/// Create a column. The server appends it after the existing ones.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateStatus {
    pub project: ProjectId,
    pub name: String,
    pub color: Option<String>,
}

impl CreateStatus {
    pub fn new(project: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            color: None,
        }
    }

    /// Set the accent color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Operation for CreateStatus {
    fn verb(&self) -> &'static str {
        "create"
    }
    fn noun(&self) -> &'static str {
        "status"
    }
    fn description(&self) -> &'static str {
        "Add a column to the end of the board"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for CreateStatus {
    type Output = Status;

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Status, KanbanError> {
        let started = Instant::now();
        let result = async {
            if self.name.trim().is_empty() {
                return Err(KanbanError::missing_field("name"));
            }
            let body = NewStatus {
                name: self.name.clone(),
                color: self.color.clone(),
            };
            Ok(ctx.statuses().create_status(self.project, &body).await?)
        }
        .await;
        ExecutionResult::logged(self.op_string(), input_of(self), started, result)
    }
}

/// Persist a column order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderStatuses {
    pub project: ProjectId,
    pub order: Vec<StatusId>,
}

impl ReorderStatuses {
    pub fn new(project: impl Into<ProjectId>, order: Vec<StatusId>) -> Self {
        Self {
            project: project.into(),
            order,
        }
    }
}

impl Operation for ReorderStatuses {
    fn verb(&self) -> &'static str {
        "reorder"
    }
    fn noun(&self) -> &'static str {
        "statuses"
    }
    fn description(&self) -> &'static str {
        "Persist the left-to-right order of all columns"
    }
}

#[async_trait]
impl Execute<BoardContext, KanbanError> for ReorderStatuses {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<(), KanbanError> {
        let started = Instant::now();
        let result = ctx
            .statuses()
            .reorder_statuses(self.project, &self.order)
            .await
            .map_err(KanbanError::from);
        ExecutionResult::logged(self.op_string(), input_of(self), started, result)
    }
}
