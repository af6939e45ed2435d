//! Integration tests for loading, refreshing, adding columns and creating tasks

use projectboard_kanban::test_support::{Call, CallKind, FakeBackend};
use projectboard_kanban::{
    AddColumnOutcome, BoardAction, BoardContext, BoardEngine, BoardEvent, KanbanError, NewStatus,
    NewTask, ProjectId, RemoteError, Status, StatusId, Task, TaskId, TaskService, ToastKind,
    ToastQueue,
};
use std::sync::Arc;

const PROJECT: ProjectId = ProjectId::new(7);
const TODO: StatusId = StatusId::new(1);
const DOING: StatusId = StatusId::new(2);

fn backend() -> Arc<FakeBackend> {
    Arc::new(
        FakeBackend::new()
            .with_statuses(vec![
                Status::new(DOING, "Doing", 1, PROJECT),
                Status::new(TODO, "Todo", 0, PROJECT),
                Status::new(99, "Other project", 0, 8),
            ])
            .with_tasks(vec![
                Task::new(10, "Plan", TODO, PROJECT),
                Task::new(11, "Build", DOING, PROJECT),
            ]),
    )
}

async fn load(backend: &Arc<FakeBackend>) -> BoardEngine {
    BoardEngine::load(BoardContext::with_backend(PROJECT, backend.clone()))
        .await
        .unwrap()
}

#[test_log::test(tokio::test)]
async fn test_load_sorts_columns_and_groups_tasks() {
    let backend = backend();
    let engine = load(&backend).await;

    let columns = engine.columns();
    let names: Vec<&str> = columns.iter().map(|c| c.status.name.as_str()).collect();
    assert_eq!(names, vec!["Todo", "Doing"]);
    assert_eq!(columns[0].tasks[0].title, "Plan");
    assert_eq!(columns[1].tasks[0].title, "Build");

    let kinds: Vec<CallKind> = backend.calls().iter().map(Call::kind).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&CallKind::ListStatuses));
    assert!(kinds.contains(&CallKind::ListTasks));
    // Reads are not activity
    assert!(engine.activity().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_load_failure_is_returned() {
    let backend = backend();
    backend.fail_next(CallKind::ListTasks, RemoteError::Unauthorized);

    let result = BoardEngine::load(BoardContext::with_backend(PROJECT, backend.clone())).await;
    assert_eq!(result.unwrap_err(), KanbanError::Remote(RemoteError::Unauthorized));
}

#[test_log::test(tokio::test)]
async fn test_add_column_refreshes_statuses() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut events = engine.events();

    let outcome = engine.add_column("  Review  ", Some("#ffcc00")).await;
    let status = match outcome {
        AddColumnOutcome::Added(status) => status,
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!(status.name, "Review");

    assert_eq!(
        backend.calls_of(CallKind::CreateStatus),
        vec![Call::CreateStatus {
            project: PROJECT,
            status: NewStatus {
                name: "Review".into(),
                color: Some("#ffcc00".into()),
            },
        }]
    );

    // The refetched list holds the new column exactly once, at the end
    let order = engine.snapshot().column_order();
    assert_eq!(order.iter().filter(|id| **id == status.id).count(), 1);
    assert_eq!(order.last(), Some(&status.id));

    let event = events.recv().await.unwrap();
    assert_eq!(event, BoardEvent::ColumnAdded { status: status.clone() });
    assert_eq!(event.toast().unwrap().kind, ToastKind::Success);
    assert_eq!(engine.activity()[0].op, "create status");
}

#[test_log::test(tokio::test)]
async fn test_add_column_default_color() {
    let backend = backend();
    let engine = load(&backend).await;

    match engine.add_column("Blocked", None).await {
        AddColumnOutcome::Added(status) => assert_eq!(status.color, "#808080"),
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_add_column_blank_name_is_cancelled() {
    let backend = backend();
    let engine = load(&backend).await;
    let calls = backend.calls().len();

    assert_eq!(engine.add_column("", Some("#fff")).await, AddColumnOutcome::Cancelled);
    assert_eq!(engine.add_column("   ", None).await, AddColumnOutcome::Cancelled);
    assert_eq!(backend.calls().len(), calls);
}

#[test_log::test(tokio::test)]
async fn test_add_column_failure_leaves_state() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut events = engine.events();
    let before = engine.snapshot();
    backend.fail_next(CallKind::CreateStatus, RemoteError::server(500, "db down"));

    let outcome = engine.add_column("Review", None).await;
    assert!(matches!(outcome, AddColumnOutcome::Failed(KanbanError::Remote(RemoteError::Server { .. }))));
    assert_eq!(engine.snapshot(), before);
    assert!(backend.calls_of(CallKind::ListStatuses).len() == 1);

    let event = events.recv().await.unwrap();
    assert!(matches!(
        event,
        BoardEvent::Failed {
            action: BoardAction::AddColumn,
            rolled_back: false,
            ..
        }
    ));

    let mut toasts = ToastQueue::new();
    toasts.push(event.toast().unwrap());
    assert_eq!(toasts.active()[0].message, "Failed to add column.");
}

#[test_log::test(tokio::test)]
async fn test_add_column_refresh_failure_still_added() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut events = engine.events();
    backend.fail_next(CallKind::ListStatuses, RemoteError::Timeout);

    assert!(matches!(engine.add_column("Review", None).await, AddColumnOutcome::Added(_)));
    assert!(matches!(
        events.recv().await.unwrap(),
        BoardEvent::Failed {
            action: BoardAction::Refresh,
            ..
        }
    ));
    assert!(matches!(events.recv().await.unwrap(), BoardEvent::ColumnAdded { .. }));
}

#[test_log::test(tokio::test)]
async fn test_create_task_refreshes_tasks() {
    let backend = backend();
    let engine = load(&backend).await;

    let created = engine
        .create_task(NewTask::new(PROJECT, "Deploy").with_status(DOING))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.title, "Deploy");

    let columns = engine.columns();
    let doing: Vec<&str> = columns[1].tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(doing, vec!["Build", "Deploy"]);
    assert_eq!(engine.activity()[0].op, "create task");
}

#[test_log::test(tokio::test)]
async fn test_create_task_uses_board_project() {
    let backend = backend();
    let engine = load(&backend).await;

    engine
        .create_task(NewTask::new(ProjectId::new(123), "Elsewhere?").with_status(TODO))
        .await
        .unwrap();
    match &backend.calls_of(CallKind::CreateTask)[0] {
        Call::CreateTask(task) => assert_eq!(task.project_id, PROJECT),
        other => panic!("unexpected call {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_create_task_blank_title() {
    let backend = backend();
    let engine = load(&backend).await;
    assert_eq!(engine.create_task(NewTask::new(PROJECT, "  ")).await, Ok(None));
    assert!(backend.calls_of(CallKind::CreateTask).is_empty());
}

#[test_log::test(tokio::test)]
async fn test_create_task_failure_is_returned_and_reported() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut events = engine.events();
    backend.fail_next(
        CallKind::CreateTask,
        RemoteError::Rejected {
            status: 400,
            message: "title too long".into(),
        },
    );

    let result = engine.create_task(NewTask::new(PROJECT, "x")).await;
    assert!(result.is_err());
    let event = events.recv().await.unwrap();
    assert_eq!(
        event.toast().unwrap().message,
        "Failed to create task. Please try again."
    );
}

#[test_log::test(tokio::test)]
async fn test_create_task_refresh_failure_still_created() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut events = engine.events();
    backend.fail_next(CallKind::ListTasks, RemoteError::Timeout);

    let created = engine
        .create_task(NewTask::new(PROJECT, "Deploy").with_status(DOING))
        .await
        .unwrap()
        .unwrap();
    assert!(backend.tasks().iter().any(|t| t.id == created.id));
    assert_eq!(backend.calls_of(CallKind::CreateTask).len(), 1);

    let event = events.recv().await.unwrap();
    assert!(matches!(
        event,
        BoardEvent::Failed {
            action: BoardAction::Refresh,
            rolled_back: false,
            ..
        }
    ));
    assert_eq!(event.toast().unwrap().message, "Failed to refresh the board.");
    assert_eq!(
        events.recv().await.unwrap(),
        BoardEvent::TaskCreated { task: created }
    );
}

#[test_log::test(tokio::test)]
async fn test_refresh_replaces_lists() {
    let backend = backend();
    let engine = load(&backend).await;
    let mut board = engine.subscribe();
    let revision = board.borrow_and_update().revision;

    // Server side changes made elsewhere
    let other = BoardContext::with_backend(PROJECT, backend.clone());
    other
        .tasks()
        .create_task(&NewTask::new(PROJECT, "Hotfix").with_status(TODO))
        .await
        .unwrap();

    engine.refresh().await.unwrap();
    assert!(board.has_changed().unwrap());
    let snapshot = board.borrow_and_update().clone();
    assert!(snapshot.revision > revision);
    assert_eq!(snapshot.tasks_in(TODO).len(), 2);
    assert!(snapshot.task(TaskId::new(10)).is_some());
}

#[test_log::test(tokio::test)]
async fn test_refresh_failure_keeps_state() {
    let backend = backend();
    let engine = load(&backend).await;
    let before = engine.snapshot();
    backend.fail_next(CallKind::ListStatuses, RemoteError::Timeout);

    assert!(engine.refresh().await.is_err());
    assert_eq!(engine.snapshot(), before);
}
