//! Board Reconciliation Engine
//!
//! Owns the client-side view of a project's columns and cards, applies drag
//! gestures to it optimistically, and reconciles with the backend in the
//! background. A failed persistence call restores the last state the server
//! is known to hold and is reported as a [`BoardEvent::Failed`]; it is never
//! returned as an error from the drag handlers.
//!
//! Every mutation goes through one setter that bumps the snapshot revision
//! and publishes it on a `watch` channel, so renderers only need
//! [`BoardEngine::subscribe`].

mod events;
mod gesture;
mod inflight;
mod state;

pub use events::{
    AddColumnOutcome, BoardAction, BoardEvent, DropOutcome, ReconcileOutcome, Reconciliation,
};
pub use gesture::IgnoreReason;
pub use state::{BoardSnapshot, ColumnView, DragPreview};

use crate::activity::ActivityLog;
use crate::context::BoardContext;
use crate::drag::{BoardEntity, DragSource, DropTarget};
use crate::error::{KanbanError, Result};
use crate::ops::{CreateStatus, CreateTask, ListStatuses, ListTasks, ReorderStatuses, UpdateTaskStatus};
use crate::ordering::array_move;
use crate::types::{NewTask, ProjectId, Status, StatusId, Task, TaskId, DEFAULT_STATUS_COLOR};
use gesture::{classify, Gesture};
use inflight::{FailureVerdict, Ticket, Tracker};
use projectboard_operations::{Execute, LogEntry, Operation};
use state::{sort_statuses, BoardState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// Buffered events per subscriber before the slowest one starts lagging
const EVENT_CAPACITY: usize = 256;

/// Persistence calls in flight, keyed by the entity they write
struct InFlight {
    /// One queue for the whole column order
    columns: Tracker<ProjectId, Vec<Status>>,
    tasks: Tracker<TaskId, Option<StatusId>>,
}

struct Shared {
    ctx: BoardContext,
    // Lock order: state before inflight
    state: Mutex<BoardState>,
    inflight: Mutex<InFlight>,
    activity: Mutex<ActivityLog>,
    snapshots: watch::Sender<BoardSnapshot>,
    events: broadcast::Sender<BoardEvent>,
    closed: CancellationToken,
}

/// What a classified drop turned into once applied
enum Applied {
    Ignored(IgnoreReason),
    TaskReordered { task: TaskId, column: StatusId },
    ColumnsReordered { status: StatusId, optimistic: Vec<Status>, ticket: Ticket },
    TaskMoved { task: TaskId, from: StatusId, to: StatusId, ticket: Ticket },
}

/// Handle to a board. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BoardEngine {
    shared: Arc<Shared>,
}

impl BoardEngine {
    /// Build an engine from already fetched statuses and tasks
    pub fn new(ctx: BoardContext, statuses: Vec<Status>, tasks: Vec<Task>) -> Self {
        let state = BoardState::new(ctx.project(), statuses, tasks);
        let (snapshots, _) = watch::channel(state.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                ctx,
                state: Mutex::new(state),
                inflight: Mutex::new(InFlight {
                    columns: Tracker::new(),
                    tasks: Tracker::new(),
                }),
                activity: Mutex::new(ActivityLog::new()),
                snapshots,
                events,
                closed: CancellationToken::new(),
            }),
        }
    }

    /// Fetch statuses and tasks concurrently and build an engine from them
    pub async fn load(ctx: BoardContext) -> Result<Self> {
        let (statuses, tasks) = fetch(&ctx).await?;
        info!(
            project = %ctx.project(),
            statuses = statuses.len(),
            tasks = tasks.len(),
            "board loaded"
        );
        Ok(Self::new(ctx, statuses, tasks))
    }

    pub fn project(&self) -> ProjectId {
        self.shared.ctx.project()
    }

    pub fn context(&self) -> &BoardContext {
        &self.shared.ctx
    }

    /// The current board
    pub fn snapshot(&self) -> BoardSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Observe every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<BoardSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Observe discrete board events
    pub fn events(&self) -> broadcast::Receiver<BoardEvent> {
        self.shared.events.subscribe()
    }

    /// Columns in display order with their cards
    pub fn columns(&self) -> Vec<ColumnView> {
        self.shared.snapshots.borrow().columns()
    }

    /// What the drag overlay should show, if a drag is active
    pub fn active_drag(&self) -> Option<DragPreview> {
        self.shared.snapshots.borrow().active_drag.clone()
    }

    /// Logged remote mutations, newest first
    pub fn activity(&self) -> Vec<LogEntry> {
        self.lock_activity().entries()
    }

    /// Number of entities with a persistence call in flight
    pub fn pending(&self) -> usize {
        let inflight = self.lock_inflight();
        inflight.columns.len() + inflight.tasks.len()
    }

    /// Whether a persistence call for `entity` is in flight
    pub fn is_pending(&self, entity: BoardEntity) -> bool {
        let inflight = self.lock_inflight();
        match entity {
            BoardEntity::Column(_) => inflight.columns.is_pending(&self.project()),
            BoardEntity::Task(id) => inflight.tasks.is_pending(&id),
        }
    }

    /// Stop applying results. Calls still queued are abandoned; calls already
    /// sent finish but their results are discarded. Later drops are ignored.
    pub fn close(&self) {
        debug!(project = %self.project(), "board closed");
        self.shared.closed.cancel();
        let mut inflight = self.lock_inflight();
        inflight.columns.clear();
        inflight.tasks.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.is_cancelled()
    }

    /// Replace the status list with server data. Last write wins.
    pub fn sync_statuses(&self, statuses: Vec<Status>) {
        let project = self.project();
        self.mutate(|state, inflight| {
            state.ordered_statuses = sort_statuses(statuses);
            inflight.columns.rebase(&project, state.ordered_statuses.clone());
            state.touch();
        });
    }

    /// Replace the task list with server data. Last write wins.
    pub fn sync_tasks(&self, tasks: Vec<Task>) {
        self.mutate(|state, inflight| {
            state.tasks = tasks;
            let tracked: Vec<TaskId> = inflight.tasks.keys().copied().collect();
            for id in tracked {
                if let Some(task) = state.task(id) {
                    inflight.tasks.rebase(&id, task.status_id);
                }
            }
            state.touch();
        });
    }

    /// Refetch both lists
    pub async fn refresh(&self) -> Result<()> {
        match fetch(&self.shared.ctx).await {
            Ok((statuses, tasks)) => {
                self.sync_statuses(statuses);
                self.sync_tasks(tasks);
                self.emit(BoardEvent::Refreshed);
                Ok(())
            }
            Err(error) => {
                warn!(project = %self.project(), %error, "board refresh failed");
                self.emit(BoardEvent::failed(BoardAction::Refresh, None, &error, false));
                Err(error)
            }
        }
    }

    /// Record the entity under the pointer for the drag overlay
    pub fn begin_drag(&self, source: DragSource) {
        self.mutate(|state, _| {
            state.active_drag = Some(source.entity);
            state.touch();
        });
    }

    /// Clear the drag overlay without dropping
    pub fn cancel_drag(&self) {
        self.mutate(|state, _| state.clear_drag());
    }

    /// Apply a drop.
    ///
    /// The local change is published before this returns. When the change
    /// needs persisting, the call runs on the tokio runtime and the returned
    /// [`Reconciliation`] resolves once its result has been applied. Must be
    /// called from within a tokio runtime.
    pub fn complete_drag(&self, active: DragSource, over: Option<DropTarget>) -> DropOutcome {
        let active = active.entity;
        let over = over.map(|target| target.entity);
        let project = self.project();

        if self.is_closed() {
            debug!(%active, "drop on a closed board ignored");
            return DropOutcome::Ignored(IgnoreReason::Closed);
        }

        let applied = self.mutate(|state, inflight| {
            state.clear_drag();
            match classify(state, active, over) {
                Gesture::Ignore(reason) => Applied::Ignored(reason),
                Gesture::ReorderColumns { status, from, to } => {
                    match array_move(&state.ordered_statuses, from, to) {
                        Some(optimistic) => {
                            let previous = std::mem::replace(&mut state.ordered_statuses, optimistic.clone());
                            state.touch();
                            let ticket = inflight.columns.begin(project, previous);
                            Applied::ColumnsReordered {
                                status,
                                optimistic,
                                ticket,
                            }
                        }
                        None => Applied::Ignored(IgnoreReason::UnresolvedTarget),
                    }
                }
                Gesture::MoveTask { task, from, to } => match state.task_mut(task) {
                    Some(moving) => {
                        moving.status_id = Some(to);
                        state.touch();
                        let ticket = inflight.tasks.begin(task, Some(from));
                        Applied::TaskMoved {
                            task,
                            from,
                            to,
                            ticket,
                        }
                    }
                    None => Applied::Ignored(IgnoreReason::UnknownSource),
                },
                Gesture::ReorderTask { task, column, from, to } => {
                    match array_move(&state.tasks, from, to) {
                        Some(tasks) => {
                            state.tasks = tasks;
                            state.touch();
                            Applied::TaskReordered { task, column }
                        }
                        None => Applied::Ignored(IgnoreReason::UnresolvedTarget),
                    }
                }
            }
        });

        match applied {
            Applied::Ignored(reason) => {
                debug!(%active, ?over, ?reason, "drop ignored");
                DropOutcome::Ignored(reason)
            }
            Applied::TaskReordered { task, column } => {
                debug!(task_id = %task, status_id = %column, "task reordered within column");
                self.emit(BoardEvent::TaskReordered { task, column });
                DropOutcome::Reordered
            }
            Applied::ColumnsReordered {
                status,
                optimistic,
                ticket,
            } => {
                let order: Vec<StatusId> = optimistic.iter().map(|s| s.id).collect();
                debug!(status_id = %status, ?order, "columns reordered");
                self.emit(BoardEvent::ColumnsReordered { order: order.clone() });

                let engine = self.clone();
                DropOutcome::Pending(self.reconcile(
                    BoardEntity::Column(status),
                    BoardAction::ReorderColumns,
                    ticket,
                    ReorderStatuses::new(project, order),
                    move |generation, result| engine.settle_reorder(status, generation, optimistic, result),
                ))
            }
            Applied::TaskMoved { task, from, to, ticket } => {
                debug!(task_id = %task, from = %from, to = %to, "task moved");
                self.emit(BoardEvent::TaskMoved { task, from, to });

                let engine = self.clone();
                DropOutcome::Pending(self.reconcile(
                    BoardEntity::Task(task),
                    BoardAction::MoveTask,
                    ticket,
                    UpdateTaskStatus::new(task, to),
                    move |generation, result| engine.settle_move(task, to, generation, result),
                ))
            }
        }
    }

    /// Create a column and refetch the status list.
    ///
    /// A name that is blank after trimming cancels without a remote call.
    /// Nothing is inserted optimistically.
    pub async fn add_column(&self, name: &str, color: Option<&str>) -> AddColumnOutcome {
        let name = name.trim();
        if name.is_empty() {
            debug!("add column cancelled: blank name");
            return AddColumnOutcome::Cancelled;
        }
        let color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_STATUS_COLOR);

        let op = CreateStatus::new(self.project(), name).with_color(color);
        let (result, entry) = op.execute(&self.shared.ctx).await.split();
        self.record(entry);

        match result {
            Ok(status) => {
                info!(status_id = %status.id, name = %status.name, "column added");
                if let Err(error) = self.refresh_statuses().await {
                    warn!(%error, "status refresh after add column failed");
                    self.emit(BoardEvent::failed(BoardAction::Refresh, None, &error, false));
                }
                self.emit(BoardEvent::ColumnAdded {
                    status: status.clone(),
                });
                AddColumnOutcome::Added(status)
            }
            Err(error) => {
                warn!(column = %name, %error, "add column failed");
                self.emit(BoardEvent::failed(BoardAction::AddColumn, None, &error, false));
                AddColumnOutcome::Failed(error)
            }
        }
    }

    /// Create a task in this project and refetch the task list.
    ///
    /// Returns `Ok(None)` for a blank title. A failed create is returned, and
    /// also reported as a [`BoardEvent::Failed`]. A failed refetch after a
    /// successful create is only reported.
    pub async fn create_task(&self, task: NewTask) -> Result<Option<Task>> {
        if task.title.trim().is_empty() {
            debug!("create task cancelled: blank title");
            return Ok(None);
        }
        let task = NewTask {
            project_id: self.project(),
            ..task
        };

        let (result, entry) = CreateTask::new(task).execute(&self.shared.ctx).await.split();
        self.record(entry);

        let created = match result {
            Ok(created) => created,
            Err(error) => {
                warn!(%error, "create task failed");
                self.emit(BoardEvent::failed(BoardAction::CreateTask, None, &error, false));
                return Err(error);
            }
        };
        info!(task_id = %created.id, "task created");

        // The task exists on the server now, so a failed refetch is not a failed create
        if let Err(error) = self.refresh_tasks().await {
            warn!(%error, "task refresh after create task failed");
            self.emit(BoardEvent::failed(BoardAction::Refresh, None, &error, false));
        }
        self.emit(BoardEvent::TaskCreated {
            task: created.clone(),
        });
        Ok(Some(created))
    }

    async fn refresh_statuses(&self) -> Result<()> {
        let statuses = ListStatuses::new(self.project())
            .execute(&self.shared.ctx)
            .await
            .into_result()?;
        self.sync_statuses(statuses);
        Ok(())
    }

    async fn refresh_tasks(&self) -> Result<()> {
        let tasks = ListTasks::new(self.project())
            .execute(&self.shared.ctx)
            .await
            .into_result()?;
        self.sync_tasks(tasks);
        Ok(())
    }

    /// Run `op` once every earlier call for the same entity has settled,
    /// then hand its result to `settle`
    fn reconcile<O, F>(
        &self,
        entity: BoardEntity,
        action: BoardAction,
        mut ticket: Ticket,
        op: O,
        settle: F,
    ) -> Reconciliation
    where
        O: Execute<BoardContext, KanbanError, Output = ()> + 'static,
        F: FnOnce(u64, Result<()>) -> ReconcileOutcome + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let engine = self.clone();
        let span = info_span!("reconcile", %entity, op = %op.op_string(), generation = ticket.generation);

        tokio::spawn(
            async move {
                let closed = engine.shared.closed.clone();
                let queued = tokio::select! {
                    _ = ticket.wait_turn() => true,
                    _ = closed.cancelled() => false,
                };
                if !queued {
                    debug!("board closed before call was sent");
                    let _ = tx.send(ReconcileOutcome::Discarded);
                    return;
                }

                let (result, entry) = op.execute(&engine.shared.ctx).await.split();
                engine.record(entry);

                let outcome = if engine.is_closed() {
                    debug!("board closed, discarding result");
                    ReconcileOutcome::Discarded
                } else {
                    settle(ticket.generation, result)
                };
                // Release the entity's queue only after the result is applied
                drop(ticket);
                let _ = tx.send(outcome);
            }
            .instrument(span),
        );

        Reconciliation::new(entity, action, rx)
    }

    fn settle_reorder(
        &self,
        status: StatusId,
        generation: u64,
        optimistic: Vec<Status>,
        result: Result<()>,
    ) -> ReconcileOutcome {
        let project = self.project();
        let entity = BoardEntity::Column(status);
        match result {
            Ok(()) => {
                self.lock_inflight().columns.settle_success(&project, generation, optimistic);
                debug!("column order committed");
                self.emit(BoardEvent::Committed {
                    action: BoardAction::ReorderColumns,
                    entity,
                });
                ReconcileOutcome::Committed
            }
            Err(error) => {
                let verdict = self.mutate(|state, inflight| {
                    let verdict = inflight.columns.settle_failure(&project, generation);
                    if let FailureVerdict::RollBack(previous) = &verdict {
                        state.ordered_statuses = previous.clone();
                        state.touch();
                    }
                    verdict
                });
                self.failed(BoardAction::ReorderColumns, entity, verdict, error)
            }
        }
    }

    fn settle_move(&self, task: TaskId, to: StatusId, generation: u64, result: Result<()>) -> ReconcileOutcome {
        let entity = BoardEntity::Task(task);
        match result {
            Ok(()) => {
                self.lock_inflight().tasks.settle_success(&task, generation, Some(to));
                debug!("task move committed");
                self.emit(BoardEvent::Committed {
                    action: BoardAction::MoveTask,
                    entity,
                });
                ReconcileOutcome::Committed
            }
            Err(error) => {
                let verdict = self.mutate(|state, inflight| {
                    let verdict = inflight.tasks.settle_failure(&task, generation);
                    if let FailureVerdict::RollBack(previous) = &verdict {
                        if let Some(moved) = state.task_mut(task) {
                            moved.status_id = *previous;
                            state.touch();
                        }
                    }
                    verdict
                });
                self.failed(BoardAction::MoveTask, entity, verdict, error)
            }
        }
    }

    fn failed<V>(
        &self,
        action: BoardAction,
        entity: BoardEntity,
        verdict: FailureVerdict<V>,
        error: KanbanError,
    ) -> ReconcileOutcome {
        let rolled_back = matches!(verdict, FailureVerdict::RollBack(_));
        if rolled_back {
            warn!(%error, "persistence failed, rolled back");
        } else {
            warn!(%error, "persistence failed, superseded by a newer gesture");
        }
        self.emit(BoardEvent::failed(action, Some(entity), &error, rolled_back));
        if rolled_back {
            ReconcileOutcome::RolledBack(error)
        } else {
            ReconcileOutcome::Superseded(error)
        }
    }

    /// The single state setter. Publishes a snapshot when `f` touched the state.
    fn mutate<R>(&self, f: impl FnOnce(&mut BoardState, &mut InFlight) -> R) -> R {
        let mut state = self.lock_state();
        let mut inflight = self.lock_inflight();
        let revision = state.revision;
        let result = f(&mut *state, &mut *inflight);
        if state.revision != revision {
            self.shared.snapshots.send_replace(state.snapshot());
        }
        result
    }

    fn emit(&self, event: BoardEvent) {
        // No receivers is fine
        let _ = self.shared.events.send(event);
    }

    fn record(&self, entry: Option<LogEntry>) {
        if let Some(entry) = entry {
            self.lock_activity().record(entry);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, BoardState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_inflight(&self) -> MutexGuard<'_, InFlight> {
        self.shared.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_activity(&self) -> MutexGuard<'_, ActivityLog> {
        self.shared.activity.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BoardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardEngine")
            .field("project", &self.project())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Fetch statuses (sorted) and tasks concurrently
async fn fetch(ctx: &BoardContext) -> Result<(Vec<Status>, Vec<Task>)> {
    let statuses = ListStatuses::new(ctx.project());
    let tasks = ListTasks::new(ctx.project());
    tokio::try_join!(
        async { statuses.execute(ctx).await.into_result() },
        async { tasks.execute(ctx).await.into_result() },
    )
}
