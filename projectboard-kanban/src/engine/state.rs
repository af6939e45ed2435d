//! Board state and the immutable snapshots published to observers

use crate::drag::BoardEntity;
use crate::types::{ProjectId, Status, StatusId, Task, TaskId};
use serde::Serialize;

/// The engine's mutable view of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoardState {
    pub project: ProjectId,
    /// Column display order
    pub ordered_statuses: Vec<Status>,
    /// Flat card list; array position is the in-column display order
    pub tasks: Vec<Task>,
    /// Entity currently being dragged, for overlay rendering only
    pub active_drag: Option<BoardEntity>,
    pub revision: u64,
}

impl BoardState {
    pub fn new(project: ProjectId, statuses: Vec<Status>, tasks: Vec<Task>) -> Self {
        Self {
            project,
            ordered_statuses: sort_statuses(statuses),
            tasks,
            active_drag: None,
            revision: 0,
        }
    }

    /// Mark the state changed so the next publish carries it
    pub fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn clear_drag(&mut self) {
        if self.active_drag.take().is_some() {
            self.touch();
        }
    }

    pub fn status_index(&self, id: StatusId) -> Option<usize> {
        self.ordered_statuses.iter().position(|s| s.id == id)
    }

    pub fn task_index(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn column_order(&self) -> Vec<StatusId> {
        self.ordered_statuses.iter().map(|s| s.id).collect()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            revision: self.revision,
            project: self.project,
            statuses: self.ordered_statuses.clone(),
            tasks: self.tasks.clone(),
            active_drag: self.active_drag.and_then(|entity| self.preview(entity)),
        }
    }

    fn preview(&self, entity: BoardEntity) -> Option<DragPreview> {
        match entity {
            BoardEntity::Column(id) => {
                let status = self.ordered_statuses.iter().find(|s| s.id == id)?;
                Some(DragPreview::Column(ColumnView::collect(status, &self.tasks)))
            }
            BoardEntity::Task(id) => self.task(id).cloned().map(DragPreview::Task),
        }
    }
}

/// Statuses in display order
pub(crate) fn sort_statuses(mut statuses: Vec<Status>) -> Vec<Status> {
    statuses.sort_by_key(|s| s.order);
    statuses
}

/// A column with the cards it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub status: Status,
    pub tasks: Vec<Task>,
}

impl ColumnView {
    fn collect(status: &Status, tasks: &[Task]) -> Self {
        Self {
            status: status.clone(),
            tasks: tasks.iter().filter(|t| t.is_in(status.id)).cloned().collect(),
        }
    }
}

/// What the drag overlay shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "view", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DragPreview {
    Column(ColumnView),
    Task(Task),
}

/// Immutable copy of the board published after every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    /// Bumped on every published change
    pub revision: u64,
    pub project: ProjectId,
    /// Columns in display order
    pub statuses: Vec<Status>,
    pub tasks: Vec<Task>,
    pub active_drag: Option<DragPreview>,
}

impl BoardSnapshot {
    /// Columns in display order, each with its cards in list order
    pub fn columns(&self) -> Vec<ColumnView> {
        self.statuses
            .iter()
            .map(|status| ColumnView::collect(status, &self.tasks))
            .collect()
    }

    pub fn status(&self, id: StatusId) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Cards of one column in display order
    pub fn tasks_in(&self, status: StatusId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_in(status)).collect()
    }

    pub fn column_order(&self) -> Vec<StatusId> {
        self.statuses.iter().map(|s| s.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BoardState {
        BoardState::new(
            ProjectId::new(1),
            vec![
                Status::new(2, "Doing", 1, 1),
                Status::new(1, "Todo", 0, 1),
            ],
            vec![
                Task::new(10, "a", 1, 1),
                Task::new(11, "b", 2, 1),
                Task::new(12, "c", 1, 1),
            ],
        )
    }

    #[test]
    fn test_statuses_sorted_on_construction() {
        assert_eq!(state().column_order(), vec![StatusId::new(1), StatusId::new(2)]);
    }

    #[test]
    fn test_columns_group_tasks_in_list_order() {
        let columns = state().snapshot().columns();
        assert_eq!(columns.len(), 2);
        let ids: Vec<TaskId> = columns[0].tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::new(10), TaskId::new(12)]);
        assert_eq!(columns[1].tasks.len(), 1);
    }

    #[test]
    fn test_drag_preview() {
        let mut state = state();
        state.active_drag = Some(BoardEntity::Column(StatusId::new(1)));
        match state.snapshot().active_drag {
            Some(DragPreview::Column(view)) => assert_eq!(view.tasks.len(), 2),
            other => panic!("unexpected preview: {other:?}"),
        }

        state.active_drag = Some(BoardEntity::Task(TaskId::new(99)));
        assert_eq!(state.snapshot().active_drag, None);
    }
}
