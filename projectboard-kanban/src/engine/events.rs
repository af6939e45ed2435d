//! Engine events and gesture outcomes

use super::gesture::IgnoreReason;
use crate::drag::BoardEntity;
use crate::error::KanbanError;
use crate::notify::{Toast, ToastKind};
use crate::types::{Status, StatusId, Task, TaskId};
use serde::Serialize;
use tokio::sync::oneshot;

/// User-level actions that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardAction {
    ReorderColumns,
    MoveTask,
    AddColumn,
    CreateTask,
    Refresh,
}

impl BoardAction {
    /// Message shown to the user when the action fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::ReorderColumns => "Failed to reorder columns. Reverting.",
            Self::MoveTask => "Failed to move task.",
            Self::AddColumn => "Failed to add column.",
            Self::CreateTask => "Failed to create task. Please try again.",
            Self::Refresh => "Failed to refresh the board.",
        }
    }
}

/// Something that happened on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    /// Columns were reordered locally; persistence is pending
    ColumnsReordered { order: Vec<StatusId> },
    /// A card moved to another column locally; persistence is pending
    TaskMoved { task: TaskId, from: StatusId, to: StatusId },
    /// A card changed position inside its column (client-side only)
    TaskReordered { task: TaskId, column: StatusId },
    /// The server accepted an optimistic change
    Committed { action: BoardAction, entity: BoardEntity },
    /// A remote call failed. `rolled_back` tells whether local state was
    /// restored.
    Failed {
        action: BoardAction,
        entity: Option<BoardEntity>,
        message: String,
        rolled_back: bool,
    },
    ColumnAdded { status: Status },
    TaskCreated { task: Task },
    /// Source lists were replaced with server data
    Refreshed,
}

impl BoardEvent {
    pub(crate) fn failed(action: BoardAction, entity: Option<BoardEntity>, error: &KanbanError, rolled_back: bool) -> Self {
        Self::Failed {
            action,
            entity,
            message: error.to_string(),
            rolled_back,
        }
    }

    /// The notification to show for this event, if any
    pub fn toast(&self) -> Option<Toast> {
        match self {
            Self::Failed { action, .. } => Some(Toast::new(ToastKind::Error, action.failure_message())),
            Self::ColumnAdded { status } => {
                Some(Toast::new(ToastKind::Success, format!("Column \"{}\" added.", status.name)))
            }
            _ => None,
        }
    }
}

/// How a persistence call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The server accepted the change
    Committed,
    /// The server rejected the change and local state was restored
    RolledBack(KanbanError),
    /// The server rejected the change but a newer gesture on the same entity
    /// owns the state, so nothing was restored
    Superseded(KanbanError),
    /// The engine was closed before the call returned
    Discarded,
}

impl ReconcileOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Handle to a persistence call started by a drop
#[derive(Debug)]
pub struct Reconciliation {
    entity: BoardEntity,
    action: BoardAction,
    rx: oneshot::Receiver<ReconcileOutcome>,
}

impl Reconciliation {
    pub(crate) fn new(entity: BoardEntity, action: BoardAction, rx: oneshot::Receiver<ReconcileOutcome>) -> Self {
        Self { entity, action, rx }
    }

    pub fn entity(&self) -> BoardEntity {
        self.entity
    }

    pub fn action(&self) -> BoardAction {
        self.action
    }

    /// Wait for the call to finish and its result to be applied
    pub async fn settled(self) -> ReconcileOutcome {
        self.rx.await.unwrap_or(ReconcileOutcome::Discarded)
    }
}

/// Result of a completed drag
#[derive(Debug)]
pub enum DropOutcome {
    /// Nothing changed
    Ignored(IgnoreReason),
    /// A card moved within its column; nothing to persist
    Reordered,
    /// State changed optimistically; the call is in flight
    Pending(Reconciliation),
}

impl DropOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// The in-flight call, if one was started
    pub fn into_reconciliation(self) -> Option<Reconciliation> {
        match self {
            Self::Pending(reconciliation) => Some(reconciliation),
            _ => None,
        }
    }
}

/// Result of [`super::BoardEngine::add_column`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddColumnOutcome {
    /// Blank name; nothing was sent
    Cancelled,
    Added(Status),
    /// The server refused; state is unchanged
    Failed(KanbanError),
}
