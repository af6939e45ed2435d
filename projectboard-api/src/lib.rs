//! REST backend for the projectboard kanban engine
//!
//! Provides [`ApiClient`], an implementation of the engine's
//! [`StatusService`](projectboard_kanban::StatusService) and
//! [`TaskService`](projectboard_kanban::TaskService) traits over HTTP, and
//! [`ApiConfig`], loaded from defaults, an optional file and
//! `PROJECTBOARD_*` environment variables.
//!
//! ```rust,no_run
//! use projectboard_api::{connect, ApiConfig};
//! use projectboard_kanban::BoardEngine;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::load()?;
//! let engine = BoardEngine::load(connect(&config, 4)?).await?;
//! println!("{} columns", engine.columns().len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::{
    ApiConfig, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS,
    ENV_PREFIX,
};
pub use error::{ConfigError, ConfigResult};

use projectboard_kanban::{BoardContext, ProjectId};
use std::sync::Arc;

/// Build a board context for `project` backed by the REST API
pub fn connect(config: &ApiConfig, project: impl Into<ProjectId>) -> ConfigResult<BoardContext> {
    let client = Arc::new(ApiClient::new(config)?);
    Ok(BoardContext::with_backend(project, client))
}
