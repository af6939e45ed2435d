//! API configuration using Figment
//!
//! Sources are merged in precedence order, later ones overriding earlier:
//! 1. Built-in defaults
//! 2. An optional config file (TOML, YAML or JSON, picked by extension)
//! 3. `PROJECTBOARD_*` environment variables
//!
//! Durations are given in milliseconds (`timeout_ms`, `retry_delay_ms`).

use crate::error::{ConfigError, ConfigResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PROJECTBOARD_";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5250/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 250;

/// Shape of the merged configuration sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct RawApiConfig {
    base_url: String,
    timeout_ms: u64,
    token: Option<String>,
    max_retries: u32,
    retry_delay_ms: u64,
    user_agent: String,
}

impl Default for RawApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            token: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("projectboard/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings for talking to the project management REST API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Root of the API, e.g. `http://localhost:5250/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Bearer token sent with every request when set
    pub token: Option<String>,
    /// Extra attempts for idempotent calls that fail transiently
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt
    pub retry_delay: Duration,
    pub user_agent: String,
}

impl ApiConfig {
    /// Defaults pointing at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    /// Load from defaults and environment variables
    pub fn load() -> ConfigResult<Self> {
        Self::from_figment(Self::figment(None)?)
    }

    /// Load from defaults, the given file, and environment variables
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        Self::from_figment(Self::figment(Some(path))?)
    }

    /// Build the figment with all sources in precedence order
    pub fn figment(path: Option<&Path>) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(RawApiConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(config_file(path)?);
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extract and validate a configuration
    pub fn from_figment(figment: Figment) -> ConfigResult<Self> {
        let raw: RawApiConfig = figment.extract()?;
        let config = Self {
            base_url: raw.base_url,
            timeout: Duration::from_millis(raw.timeout_ms),
            token: raw.token.filter(|t| !t.trim().is_empty()),
            max_retries: raw.max_retries,
            retry_delay: Duration::from_millis(raw.retry_delay_ms),
            user_agent: raw.user_agent,
        };
        config.validate()?;
        debug!(base_url = %config.base_url, has_token = config.token.is_some(), "api config loaded");
        Ok(config)
    }

    /// Check the values make sense
    pub fn validate(&self) -> ConfigResult<()> {
        self.base()?;
        if self.timeout.is_zero() {
            return Err(ConfigError::invalid_value("timeout_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// The base URL, parsed and ending in `/` so relative paths join below it
    pub fn base(&self) -> ConfigResult<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw).map_err(|e| ConfigError::invalid_value("base_url", e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::invalid_value(
                "base_url",
                format!("unsupported scheme: {scheme}"),
            )),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let raw = RawApiConfig::default();
        Self {
            base_url: raw.base_url,
            timeout: Duration::from_millis(raw.timeout_ms),
            token: None,
            max_retries: raw.max_retries,
            retry_delay: Duration::from_millis(raw.retry_delay_ms),
            user_agent: raw.user_agent,
        }
    }
}

/// A figment for one config file, format chosen by extension
fn config_file(path: &Path) -> ConfigResult<Figment> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
