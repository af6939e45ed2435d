//! Property-based tests for board ordering and no-op safety
//!
//! Drives random gesture sequences through the engine against the in-memory
//! backend.

use proptest::prelude::*;
use projectboard_kanban::test_support::FakeBackend;
use projectboard_kanban::{
    BoardContext, BoardEngine, BoardEntity, DragSource, DropOutcome, DropTarget, ProjectId,
    Status, StatusId, Task, TaskId,
};
use std::sync::Arc;

const PROJECT: ProjectId = ProjectId::new(1);

fn engine(columns: usize, tasks_per_column: usize) -> BoardEngine {
    let statuses: Vec<Status> = (0..columns)
        .map(|i| Status::new(i as i64 + 1, format!("Column {i}"), i as i32, PROJECT))
        .collect();
    let tasks: Vec<Task> = (0..columns * tasks_per_column)
        .map(|i| {
            Task::new(
                100 + i as i64,
                format!("Task {i}"),
                (i % columns) as i64 + 1,
                PROJECT,
            )
        })
        .collect();
    let backend = Arc::new(
        FakeBackend::new()
            .with_statuses(statuses.clone())
            .with_tasks(tasks.clone()),
    );
    BoardEngine::new(BoardContext::with_backend(PROJECT, backend), statuses, tasks)
}

/// An entity that may or may not exist on a board of the given size
fn entity(columns: usize, tasks: usize) -> impl Strategy<Value = BoardEntity> {
    prop_oneof![
        (1..=columns as i64 + 1).prop_map(|id| BoardEntity::Column(StatusId::new(id))),
        (100..=100 + tasks as i64).prop_map(|id| BoardEntity::Task(TaskId::new(id))),
    ]
}

proptest! {
    /// Property: every successful column drop yields a permutation of the
    /// original columns with the dragged one at the target index and all
    /// others in their previous relative order.
    #[test]
    fn test_column_reorders_preserve_order_invariant(
        columns in 2usize..7,
        moves in prop::collection::vec((0usize..16, 0usize..16), 1..12),
    ) {
        tokio_test::block_on(async {
            let engine = engine(columns, 1);
            let mut original: Vec<StatusId> = engine.snapshot().column_order();
            original.sort();

            for (from_seed, to_seed) in moves {
                let before = engine.snapshot().column_order();
                let from = from_seed % columns;
                let to = to_seed % columns;
                let dragged = before[from];

                let outcome = engine.complete_drag(
                    DragSource::new(dragged),
                    Some(DropTarget::new(before[to])),
                );
                let after = engine.snapshot().column_order();

                if from == to {
                    prop_assert!(outcome.is_ignored());
                    prop_assert_eq!(&after, &before);
                    continue;
                }

                let call = outcome.into_reconciliation();
                prop_assert!(call.is_some());
                prop_assert!(call.unwrap().settled().await.is_committed());

                let mut sorted = after.clone();
                sorted.sort();
                prop_assert_eq!(&sorted, &original);
                prop_assert_eq!(after[to], dragged);

                let rest_after: Vec<StatusId> = after.iter().copied().filter(|id| *id != dragged).collect();
                let rest_before: Vec<StatusId> = before.iter().copied().filter(|id| *id != dragged).collect();
                prop_assert_eq!(rest_after, rest_before);
            }
            Ok(())
        })?;
    }

    /// Property: dropping onto nothing or onto the dragged entity itself
    /// never changes the board or calls the backend.
    #[test]
    fn test_noop_drops_never_mutate(
        drops in prop::collection::vec((entity(4, 8), any::<bool>()), 1..20),
    ) {
        tokio_test::block_on(async {
            let engine = engine(4, 2);
            let before = engine.snapshot();

            for (active, outside) in drops {
                let target = if outside { None } else { Some(DropTarget { entity: active }) };
                let outcome = engine.complete_drag(DragSource { entity: active }, target);
                prop_assert!(matches!(outcome, DropOutcome::Ignored(_)));
            }

            let after = engine.snapshot();
            prop_assert_eq!(&after.tasks, &before.tasks);
            prop_assert_eq!(&after.statuses, &before.statuses);
            prop_assert_eq!(engine.pending(), 0);
            Ok(())
        })?;
    }
}
