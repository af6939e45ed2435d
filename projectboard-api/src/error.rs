//! Errors raised while loading the API configuration or building the client

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Why an [`ApiConfig`](crate::ApiConfig) or [`ApiClient`](crate::ApiClient)
/// could not be produced
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly named config file is missing
    #[error("config file {path} does not exist")]
    FileNotFound { path: PathBuf },

    /// Only toml, yaml, yml and json files are read
    #[error("cannot tell the format of config file {path}")]
    UnsupportedFormat { path: PathBuf },

    /// A source could not be read or a value has the wrong type
    #[error("could not extract API settings: {source}")]
    ParseError {
        #[from]
        source: figment::Error,
    },

    /// A value parsed but is unusable
    #[error("{key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("could not build the HTTP client: {message}")]
    Client { message: String },
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
