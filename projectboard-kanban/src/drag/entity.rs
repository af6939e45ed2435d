//! Draggable and droppable board entities

use crate::types::{StatusId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing is being dragged or dropped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Column,
    Task,
}

/// A column or a card on the board.
///
/// Ids are typed per kind, so column 3 and task 3 are different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardEntity {
    Column(StatusId),
    Task(TaskId),
}

impl BoardEntity {
    /// The entity's kind
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Column(_) => EntityKind::Column,
            Self::Task(_) => EntityKind::Task,
        }
    }

    /// The raw backend id, without its kind
    pub fn raw_id(&self) -> i64 {
        match self {
            Self::Column(id) => id.get(),
            Self::Task(id) => id.get(),
        }
    }
}

impl From<StatusId> for BoardEntity {
    fn from(id: StatusId) -> Self {
        Self::Column(id)
    }
}

impl From<TaskId> for BoardEntity {
    fn from(id: TaskId) -> Self {
        Self::Task(id)
    }
}

impl fmt::Display for BoardEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(id) => write!(f, "column {id}"),
            Self::Task(id) => write!(f, "task {id}"),
        }
    }
}

/// The entity under the pointer when a drag starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragSource {
    pub entity: BoardEntity,
}

impl DragSource {
    pub fn new(entity: impl Into<BoardEntity>) -> Self {
        Self {
            entity: entity.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.entity.raw_id()
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

/// The entity a dragged item was released over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub entity: BoardEntity,
}

impl DropTarget {
    pub fn new(entity: impl Into<BoardEntity>) -> Self {
        Self {
            entity: entity.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.entity.raw_id()
    }

    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_raw_id_different_kind_is_distinct() {
        let column = BoardEntity::Column(StatusId::new(3));
        let task = BoardEntity::Task(TaskId::new(3));
        assert_ne!(column, task);
        assert_eq!(column.raw_id(), task.raw_id());
        assert_eq!(DragSource::new(TaskId::new(3)).kind(), EntityKind::Task);
    }

    #[test]
    fn test_entity_wire_format() {
        let json = serde_json::to_value(BoardEntity::Column(StatusId::new(2))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "COLUMN", "id": 2}));
    }
}
