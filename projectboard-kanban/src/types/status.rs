//! Status (column) types

use super::ids::{ProjectId, StatusId};
use super::timestamp::null_as_default;
use serde::{Deserialize, Serialize};

/// Accent color given to a column created without one
pub const DEFAULT_STATUS_COLOR: &str = "#808080";

/// A named, ordered stage of a project's workflow. Rendered as a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: StatusId,
    pub name: String,
    /// Display accent only, never used for logic
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
    /// Left-to-right rank within the project
    pub order: i32,
    pub project_id: ProjectId,
}

impl Status {
    /// Create a status
    pub fn new(id: impl Into<StatusId>, name: impl Into<String>, order: i32, project_id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: DEFAULT_STATUS_COLOR.to_string(),
            order,
            project_id: project_id.into(),
        }
    }

    /// Set the accent color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Body of a "create status" call. The project comes from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStatus {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Body of an "update status" call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: StatusId,
    pub name: String,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        let json = r##"{"id":3,"name":"Doing","color":null,"order":1,"projectId":9}"##;
        let status: Status = serde_json::from_str(json).unwrap();
        assert_eq!(status.id, StatusId::new(3));
        assert_eq!(status.color, "");
        assert_eq!(status.project_id, ProjectId::new(9));

        let out = serde_json::to_value(Status::new(1, "Todo", 0, 9)).unwrap();
        assert_eq!(out["projectId"], 9);
        assert_eq!(out["color"], DEFAULT_STATUS_COLOR);
    }

    #[test]
    fn test_new_status_omits_missing_color() {
        let body = NewStatus {
            name: "Review".into(),
            color: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"name": "Review"})
        );
    }
}
