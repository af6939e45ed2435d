//! HTTP client for the project management REST API.
//!
//! Implements the board's status and task services over `reqwest`, with
//! bearer authentication, status code mapping and exponential backoff for
//! idempotent calls.

use crate::config::ApiConfig;
use crate::error::{ConfigError, ConfigResult};
use async_trait::async_trait;
use projectboard_kanban::{
    NewStatus, NewTask, ProjectId, RemoteError, Status, StatusId, StatusService, StatusUpdate,
    Task, TaskId, TaskService,
};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

// Exponential backoff constant
const BACKOFF_MULTIPLIER: u32 = 2;

/// Whether a failed call may be repeated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    Idempotent,
    Never,
}

/// REST client for statuses and tasks
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
    max_retries: u32,
    base_delay: Duration,
}

impl ApiClient {
    /// Build a client from a validated configuration
    pub fn new(config: &ApiConfig) -> ConfigResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ConfigError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base: config.base()?,
            token: config.token.clone(),
            max_retries: config.max_retries,
            base_delay: config.retry_delay,
        })
    }

    /// The API root every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| RemoteError::transport(format!("invalid request path {path}: {e}")))
    }

    /// Single attempt: send and map the status code
    async fn send_once(&self, method: &Method, url: &Url, body: Option<&Value>) -> Result<Response, RemoteError> {
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        debug!(%status, "received response");
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(map_status(status, url, message))
    }

    /// Send a request, retrying transient failures of idempotent calls
    #[instrument(skip(self, body), fields(attempt, max_retries = self.max_retries))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        retry: Retry,
    ) -> Result<Response, RemoteError> {
        let url = self.endpoint(path)?;
        let attempts = match retry {
            Retry::Idempotent => self.max_retries,
            Retry::Never => 0,
        };

        let mut attempt = 0;
        loop {
            tracing::Span::current().record("attempt", attempt);
            match self.send_once(&method, &url, body.as_ref()).await {
                Err(error) if error.is_retryable() && attempt < attempts => {
                    let delay = self.base_delay * BACKOFF_MULTIPLIER.pow(attempt);
                    debug!(%error, ?delay, "retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let response = self.execute(Method::GET, path, None, Retry::Never).await?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, RemoteError> {
        let response = self
            .execute(Method::POST, path, Some(encode(body)?), Retry::Never)
            .await?;
        decode(response).await
    }

    async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        self.execute(Method::PUT, path, Some(encode(body)?), Retry::Idempotent)
            .await
            .map(|_| ())
    }

    async fn delete(&self, path: &str) -> Result<(), RemoteError> {
        self.execute(Method::DELETE, path, None, Retry::Idempotent)
            .await
            .map(|_| ())
    }
}

fn encode<B: Serialize>(body: &B) -> Result<Value, RemoteError> {
    serde_json::to_value(body).map_err(|e| RemoteError::Decode {
        message: format!("failed to encode request body: {e}"),
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    let text = response.text().await.map_err(map_reqwest_error)?;
    serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
        message: e.to_string(),
    })
}

fn map_reqwest_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::transport(error.to_string())
    }
}

fn map_status(status: StatusCode, url: &Url, message: String) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED => {
            warn!(%url, "request unauthorized; token missing or expired");
            RemoteError::Unauthorized
        }
        StatusCode::NOT_FOUND => RemoteError::not_found(url.path().to_string()),
        StatusCode::TOO_MANY_REQUESTS => RemoteError::server(status.as_u16(), message),
        s if s.is_server_error() => RemoteError::server(s.as_u16(), message),
        s => RemoteError::Rejected {
            status: s.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl StatusService for ApiClient {
    #[instrument(skip(self))]
    async fn list_statuses(&self, project: ProjectId) -> Result<Vec<Status>, RemoteError> {
        self.get_json(&format!("projects/{project}/statuses")).await
    }

    #[instrument(skip(self, status), fields(name = %status.name))]
    async fn create_status(&self, project: ProjectId, status: &NewStatus) -> Result<Status, RemoteError> {
        self.post_json(&format!("projects/{project}/statuses"), status).await
    }

    #[instrument(skip(self))]
    async fn reorder_statuses(&self, project: ProjectId, order: &[StatusId]) -> Result<(), RemoteError> {
        self.put_json(
            &format!("projects/{project}/statuses/reorder"),
            &json!({ "statusIdsInOrder": order }),
        )
        .await
    }

    #[instrument(skip(self, update), fields(status_id = %update.id))]
    async fn update_status(&self, update: &StatusUpdate) -> Result<(), RemoteError> {
        self.put_json(&format!("statuses/{}", update.id), update).await
    }

    #[instrument(skip(self))]
    async fn delete_status(&self, status: StatusId) -> Result<(), RemoteError> {
        self.delete(&format!("statuses/{status}")).await
    }
}

#[async_trait]
impl TaskService for ApiClient {
    #[instrument(skip(self))]
    async fn list_tasks(&self, project: ProjectId) -> Result<Vec<Task>, RemoteError> {
        self.get_json(&format!("tasks/project/{project}")).await
    }

    #[instrument(skip(self, task), fields(title = %task.title))]
    async fn create_task(&self, task: &NewTask) -> Result<Task, RemoteError> {
        self.post_json("tasks", task).await
    }

    #[instrument(skip(self))]
    async fn update_task_status(&self, task: TaskId, status: StatusId) -> Result<(), RemoteError> {
        self.put_json(&format!("tasks/{task}/status"), &json!({ "newStatusId": status }))
            .await
    }
}
