//! Task (card) types

use super::ids::{ProjectId, StatusId, TaskId, UserId};
use super::timestamp::{lenient_datetime, null_as_default};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A user as embedded in task payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

/// Link between a task and one of its assignees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignee {
    pub user: User,
}

/// A unit of work. Belongs to exactly one status at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    #[serde(default, with = "lenient_datetime")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "lenient_datetime")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default, with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    /// The column the card occupies. The only field drag-and-drop mutates.
    #[serde(default)]
    pub status_id: Option<StatusId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_assignees: Vec<TaskAssignee>,
    pub project_id: ProjectId,
}

impl Task {
    /// Create a task in the given column
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        status_id: impl Into<StatusId>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            priority: Priority::default(),
            start_date: None,
            deadline: None,
            created_at: None,
            status_id: Some(status_id.into()),
            task_assignees: Vec::new(),
            project_id: project_id.into(),
        }
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Add an assignee
    pub fn with_assignee(mut self, user: User) -> Self {
        self.task_assignees.push(TaskAssignee { user });
        self
    }

    /// Check whether the task sits in the given column
    pub fn is_in(&self, status: StatusId) -> bool {
        self.status_id == Some(status)
    }
}

/// Body of a "create task" call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default, with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "lenient_datetime", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<StatusId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_user_ids: Vec<UserId>,
    pub project_id: ProjectId,
}

impl NewTask {
    /// Create a request with just a title
    pub fn new(project_id: impl Into<ProjectId>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Place the new task in a column
    pub fn with_status(mut self, status: impl Into<StatusId>) -> Self {
        self.status_id = Some(status.into());
        self
    }

    /// Set the deadline
    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the assignees
    pub fn with_assignees(mut self, users: Vec<UserId>) -> Self {
        self.assigned_user_ids = users;
        self
    }
}
