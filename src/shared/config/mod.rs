//! Application configuration module
//!
//! Provides the validated configuration consumed by the sync client. Values can
//! come from the builder, from environment variables (see
//! [`crate::client::Config`]) or from a TOML file.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default chat API base URL
pub const DEFAULT_SERVER_URL: &str = "https://dummy-chat-server.tribechat.com/api";

/// Default key the snapshot is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "tribe-chat-storage";

const DEFAULT_REFRESH_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Chat API base URL, without trailing slash
    pub server_url: String,
    /// Interval between background refreshes
    pub refresh_interval: Duration,
    /// Per-request timeout applied by the HTTP transport
    pub request_timeout: Duration,
    /// SQLite file holding the persisted snapshot; `None` uses the data dir
    pub database_path: Option<PathBuf>,
    /// Key the snapshot is stored under
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            database_path: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::InvalidValue("refresh_interval must be non-zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue("request_timeout must be non-zero"));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue("storage_key must not be empty"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    refresh_interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    database_path: Option<PathBuf>,
    storage_key: Option<String>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the background refresh interval in seconds
    pub fn refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = Some(secs);
        self
    }

    /// Set the HTTP request timeout in seconds
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Set the SQLite database path
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the persisted snapshot key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Fill unset values from `other`
    pub fn or(self, other: AppConfigBuilder) -> Self {
        Self {
            server_url: self.server_url.or(other.server_url),
            refresh_interval_secs: self.refresh_interval_secs.or(other.refresh_interval_secs),
            request_timeout_secs: self.request_timeout_secs.or(other.request_timeout_secs),
            database_path: self.database_path.or(other.database_path),
            storage_key: self.storage_key.or(other.storage_key),
        }
    }

    /// Parse builder values from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            refresh_interval: self
                .refresh_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            database_path: self.database_path,
            storage_key: self.storage_key.unwrap_or(defaults.storage_key),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
