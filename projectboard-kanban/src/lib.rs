//! Kanban board reconciliation engine
//!
//! This crate keeps a client-side view of a project's board (columns and the
//! cards in them) consistent with a remote backend while the user drags
//! things around. Changes are applied optimistically, persisted in the
//! background, and rolled back when the backend refuses them.
//!
//! ## Overview
//!
//! - **Optimistic** - a drop is visible before the network call is made
//! - **Ordered** - persistence calls for one entity run in gesture order
//! - **Observable** - every change publishes a [`BoardSnapshot`]
//! - **Backend agnostic** - persistence goes through [`StatusService`] and
//!   [`TaskService`]
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use projectboard_kanban::{BoardContext, BoardEngine, DragSource, DropTarget, StatusId};
//!
//! # async fn example(ctx: BoardContext) -> projectboard_kanban::Result<()> {
//! let engine = BoardEngine::load(ctx).await?;
//! let mut board = engine.subscribe();
//!
//! // Drag the "Done" column in front of "Todo"
//! let done = StatusId::new(3);
//! engine.begin_drag(DragSource::new(done));
//! let outcome = engine.complete_drag(DragSource::new(done), Some(DropTarget::new(StatusId::new(1))));
//!
//! // The new order is already published
//! board.changed().await.ok();
//! println!("{:?}", board.borrow().column_order());
//!
//! if let Some(call) = outcome.into_reconciliation() {
//!     println!("{:?}", call.settled().await);
//! }
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod ordering;
mod services;

pub mod activity;
pub mod drag;
pub mod engine;
pub mod notify;
pub mod ops;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export Execute trait and types from operations crate
pub use projectboard_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};

pub use context::BoardContext;
pub use error::{KanbanError, RemoteError, Result};
pub use ordering::array_move;
pub use services::{StatusService, TaskService};

pub use drag::{BoardEntity, DragSource, DropTarget, EntityKind};
pub use engine::{
    AddColumnOutcome, BoardAction, BoardEngine, BoardEvent, BoardSnapshot, ColumnView, DragPreview,
    DropOutcome, IgnoreReason, ReconcileOutcome, Reconciliation,
};
pub use notify::{Toast, ToastKind, ToastQueue};

// Re-export commonly used types
pub use types::{
    NewStatus, NewTask, Priority, ProjectId, Status, StatusId, StatusUpdate, Task, TaskAssignee,
    TaskId, User, UserId,
};
