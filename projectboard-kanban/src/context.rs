//! BoardContext - the services a board is reconciled against

use crate::services::{StatusService, TaskService};
use crate::types::ProjectId;
use std::fmt;
use std::sync::Arc;

/// Everything operations need to reach the backend for one project
#[derive(Clone)]
pub struct BoardContext {
    project: ProjectId,
    statuses: Arc<dyn StatusService>,
    tasks: Arc<dyn TaskService>,
}

impl BoardContext {
    /// Create a context from separate status and task services
    pub fn new(
        project: impl Into<ProjectId>,
        statuses: Arc<dyn StatusService>,
        tasks: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            project: project.into(),
            statuses,
            tasks,
        }
    }

    /// Create a context from one backend implementing both services
    pub fn with_backend<B>(project: impl Into<ProjectId>, backend: Arc<B>) -> Self
    where
        B: StatusService + TaskService + 'static,
    {
        Self::new(project, backend.clone(), backend)
    }

    /// The project this board shows
    pub fn project(&self) -> ProjectId {
        self.project
    }

    pub fn statuses(&self) -> &dyn StatusService {
        self.statuses.as_ref()
    }

    pub fn tasks(&self) -> &dyn TaskService {
        self.tasks.as_ref()
    }
}

impl fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardContext")
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}
