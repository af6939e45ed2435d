//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, KanbanError>;

/// Errors returned by the remote status and task services
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The server rejected the credentials (HTTP 401)
    #[error("unauthorized: token missing, invalid or expired")]
    Unauthorized,

    /// The addressed resource does not exist (HTTP 404)
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// The server refused the request (other 4xx)
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The server failed or throttled the request (5xx, 429)
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The request never produced a response
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The response body could not be decoded
    #[error("decode error: {message}")]
    Decode { message: String },

    /// The request timed out
    #[error("request timed out")]
    Timeout,
}

impl RemoteError {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::Transport { .. } | Self::Timeout
        )
    }
}

/// Errors that can occur in board operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KanbanError {
    /// A remote call failed
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Status (column) not found on the board
    #[error("status not found: {id}")]
    StatusNotFound { id: String },

    /// Task (card) not found on the board
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl KanbanError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_retryable())
    }
}
