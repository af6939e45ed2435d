//! Drop classification
//!
//! Turns a (dragged, dropped-on) pair into what the engine should do with
//! it. Pure: reads the board, never mutates it.

use super::state::BoardState;
use crate::drag::BoardEntity;
use crate::types::{StatusId, TaskId};
use serde::Serialize;

/// Why a drop changed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Released outside any drop target
    NoTarget,
    /// Released over the dragged entity itself
    DroppedOnSelf,
    /// The dragged entity is not on the board
    UnknownSource,
    /// The source or target column could not be determined
    UnresolvedTarget,
    /// The drop would leave everything where it is
    Unchanged,
    /// The board was closed
    Closed,
}

/// What a drop means for the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gesture {
    Ignore(IgnoreReason),
    ReorderColumns { status: StatusId, from: usize, to: usize },
    MoveTask { task: TaskId, from: StatusId, to: StatusId },
    ReorderTask { task: TaskId, column: StatusId, from: usize, to: usize },
}

pub(crate) fn classify(state: &BoardState, active: BoardEntity, over: Option<BoardEntity>) -> Gesture {
    let Some(over) = over else {
        return Gesture::Ignore(IgnoreReason::NoTarget);
    };
    if active == over {
        return Gesture::Ignore(IgnoreReason::DroppedOnSelf);
    }

    match active {
        BoardEntity::Column(status) => classify_column(state, status, over),
        BoardEntity::Task(task) => classify_task(state, task, over),
    }
}

/// The column an entity lives in, if it is on the board
fn container_of(state: &BoardState, entity: BoardEntity) -> Option<StatusId> {
    match entity {
        BoardEntity::Column(id) => state.status_index(id).map(|_| id),
        BoardEntity::Task(id) => state.task(id)?.status_id,
    }
}

fn classify_column(state: &BoardState, status: StatusId, over: BoardEntity) -> Gesture {
    let Some(from) = state.status_index(status) else {
        return Gesture::Ignore(IgnoreReason::UnknownSource);
    };
    // A column released over a card lands where the card's column is
    let Some(to) = container_of(state, over).and_then(|id| state.status_index(id)) else {
        return Gesture::Ignore(IgnoreReason::UnresolvedTarget);
    };
    if from == to {
        return Gesture::Ignore(IgnoreReason::Unchanged);
    }
    Gesture::ReorderColumns { status, from, to }
}

fn classify_task(state: &BoardState, task: TaskId, over: BoardEntity) -> Gesture {
    let Some(source) = state.task(task) else {
        return Gesture::Ignore(IgnoreReason::UnknownSource);
    };
    let (Some(active_column), Some(over_column)) = (source.status_id, container_of(state, over)) else {
        return Gesture::Ignore(IgnoreReason::UnresolvedTarget);
    };

    if active_column != over_column {
        return Gesture::MoveTask {
            task,
            from: active_column,
            to: over_column,
        };
    }

    match over {
        BoardEntity::Task(target) => match (state.task_index(task), state.task_index(target)) {
            (Some(from), Some(to)) => Gesture::ReorderTask {
                task,
                column: active_column,
                from,
                to,
            },
            _ => Gesture::Ignore(IgnoreReason::UnresolvedTarget),
        },
        BoardEntity::Column(_) => Gesture::Ignore(IgnoreReason::Unchanged),
    }
}
