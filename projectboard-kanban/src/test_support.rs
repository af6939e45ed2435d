//! In-memory backend for tests
//!
//! `FakeBackend` implements both service traits over plain vectors, records
//! every call, and can be scripted to fail or to hold calls open until the
//! test releases them. Held calls make interleavings of concurrent drags
//! deterministic.

use crate::error::RemoteError;
use crate::services::{StatusService, TaskService};
use crate::types::{
    NewStatus, NewTask, ProjectId, Status, StatusId, StatusUpdate, Task, TaskId,
    DEFAULT_STATUS_COLOR,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};

/// Which service method a call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    ListStatuses,
    CreateStatus,
    ReorderStatuses,
    UpdateStatus,
    DeleteStatus,
    ListTasks,
    CreateTask,
    UpdateTaskStatus,
}

/// A recorded call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListStatuses(ProjectId),
    CreateStatus { project: ProjectId, status: NewStatus },
    ReorderStatuses { project: ProjectId, order: Vec<StatusId> },
    UpdateStatus(StatusUpdate),
    DeleteStatus(StatusId),
    ListTasks(ProjectId),
    CreateTask(NewTask),
    UpdateTaskStatus { task: TaskId, status: StatusId },
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Self::ListStatuses(_) => CallKind::ListStatuses,
            Self::CreateStatus { .. } => CallKind::CreateStatus,
            Self::ReorderStatuses { .. } => CallKind::ReorderStatuses,
            Self::UpdateStatus(_) => CallKind::UpdateStatus,
            Self::DeleteStatus(_) => CallKind::DeleteStatus,
            Self::ListTasks(_) => CallKind::ListTasks,
            Self::CreateTask(_) => CallKind::CreateTask,
            Self::UpdateTaskStatus { .. } => CallKind::UpdateTaskStatus,
        }
    }
}

/// A call parked until the test decides how it ends
#[derive(Debug)]
pub struct HeldCall {
    pub call: Call,
    responder: oneshot::Sender<Result<(), RemoteError>>,
}

impl HeldCall {
    /// Let the call proceed. Scripted failures still apply.
    pub fn succeed(self) {
        let _ = self.responder.send(Ok(()));
    }

    /// End the call with an error
    pub fn fail(self, error: RemoteError) {
        let _ = self.responder.send(Err(error));
    }
}

#[derive(Default)]
struct FakeState {
    statuses: Vec<Status>,
    tasks: Vec<Task>,
    next_id: i64,
    calls: Vec<Call>,
    failures: HashMap<CallKind, VecDeque<RemoteError>>,
    held: HashSet<CallKind>,
}

/// In-memory status and task backend
pub struct FakeBackend {
    state: Mutex<FakeState>,
    held_tx: mpsc::UnboundedSender<HeldCall>,
    held_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<HeldCall>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let (held_tx, held_rx) = mpsc::unbounded_channel();
        Self {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..FakeState::default()
            }),
            held_tx,
            held_rx: tokio::sync::Mutex::new(held_rx),
        }
    }

    /// Seed the server-side statuses
    pub fn with_statuses(self, statuses: Vec<Status>) -> Self {
        self.lock().statuses = statuses;
        self
    }

    /// Seed the server-side tasks
    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        self.lock().tasks = tasks;
        self
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next call of `kind` fail with `error`. Queues up.
    pub fn fail_next(&self, kind: CallKind, error: RemoteError) {
        self.lock().failures.entry(kind).or_default().push_back(error);
    }

    /// Park every following call of `kind` until released via [`Self::next_held`]
    pub fn hold(&self, kind: CallKind) {
        self.lock().held.insert(kind);
    }

    /// Stop parking calls of `kind`
    pub fn release(&self, kind: CallKind) {
        self.lock().held.remove(&kind);
    }

    /// Wait for the next parked call
    pub async fn next_held(&self) -> HeldCall {
        let mut rx = self.held_rx.lock().await;
        match rx.recv().await {
            Some(held) => held,
            None => unreachable!("sender lives as long as the backend"),
        }
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Calls of one kind, in order
    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.kind() == kind)
            .cloned()
            .collect()
    }

    /// Server-side statuses, sorted by order
    pub fn statuses(&self) -> Vec<Status> {
        let mut statuses = self.lock().statuses.clone();
        statuses.sort_by_key(|s| s.order);
        statuses
    }

    /// Server-side tasks
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Server-side copy of one task
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Record the call, wait if it is held, then apply any scripted failure
    async fn enter(&self, call: Call) -> Result<(), RemoteError> {
        let kind = call.kind();
        let held = {
            let mut state = self.lock();
            state.calls.push(call.clone());
            state.held.contains(&kind)
        };

        if held {
            let (responder, gate) = oneshot::channel();
            let _ = self.held_tx.send(HeldCall { call, responder });
            gate.await
                .unwrap_or_else(|_| Err(RemoteError::transport("held call dropped")))?;
        }

        match self.lock().failures.get_mut(&kind).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusService for FakeBackend {
    async fn list_statuses(&self, project: ProjectId) -> Result<Vec<Status>, RemoteError> {
        self.enter(Call::ListStatuses(project)).await?;
        Ok(self
            .lock()
            .statuses
            .iter()
            .filter(|s| s.project_id == project)
            .cloned()
            .collect())
    }

    async fn create_status(&self, project: ProjectId, status: &NewStatus) -> Result<Status, RemoteError> {
        self.enter(Call::CreateStatus {
            project,
            status: status.clone(),
        })
        .await?;

        let mut state = self.lock();
        state.next_id += 1;
        let order = state
            .statuses
            .iter()
            .filter(|s| s.project_id == project)
            .map(|s| s.order + 1)
            .max()
            .unwrap_or(0);
        let created = Status::new(state.next_id, status.name.clone(), order, project).with_color(
            status
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS_COLOR.to_string()),
        );
        state.statuses.push(created.clone());
        Ok(created)
    }

    async fn reorder_statuses(&self, project: ProjectId, order: &[StatusId]) -> Result<(), RemoteError> {
        self.enter(Call::ReorderStatuses {
            project,
            order: order.to_vec(),
        })
        .await?;

        let mut state = self.lock();
        for status in state.statuses.iter_mut() {
            if let Some(position) = order.iter().position(|id| *id == status.id) {
                status.order = position as i32;
            }
        }
        Ok(())
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<(), RemoteError> {
        self.enter(Call::UpdateStatus(update.clone())).await?;

        let mut state = self.lock();
        let status = state
            .statuses
            .iter_mut()
            .find(|s| s.id == update.id)
            .ok_or_else(|| RemoteError::not_found(format!("status {}", update.id)))?;
        status.name = update.name.clone();
        status.color = update.color.clone();
        Ok(())
    }

    async fn delete_status(&self, id: StatusId) -> Result<(), RemoteError> {
        self.enter(Call::DeleteStatus(id)).await?;

        let mut state = self.lock();
        let before = state.statuses.len();
        state.statuses.retain(|s| s.id != id);
        if state.statuses.len() == before {
            return Err(RemoteError::not_found(format!("status {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskService for FakeBackend {
    async fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, RemoteError> {
        self.enter(Call::ListTasks(project)).await?;
        Ok(self
            .lock()
            .tasks
            .iter()
            .filter(|t| t.project_id == project)
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, RemoteError> {
        self.enter(Call::CreateTask(task.clone())).await?;

        let mut state = self.lock();
        state.next_id += 1;
        let created = Task {
            id: TaskId::new(state.next_id),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            start_date: task.start_date,
            deadline: task.deadline,
            created_at: None,
            status_id: task.status_id,
            task_assignees: Vec::new(),
            project_id: task.project_id,
        };
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task_status(&self, task: TaskId, status: StatusId) -> Result<(), RemoteError> {
        self.enter(Call::UpdateTaskStatus { task, status }).await?;

        let mut state = self.lock();
        let stored = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task)
            .ok_or_else(|| RemoteError::not_found(format!("task {task}")))?;
        stored.status_id = Some(status);
        Ok(())
    }
}
