use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Runtime configuration for the sync client.
///
/// Values resolve in order: explicit builder/file values, then environment
/// (`CHAT_API_URL`, `CHAT_REFRESH_SECS`, `CHAT_DB_PATH`), then defaults.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid environment configuration: {}", e);
            Self {
                app: AppConfig::default(),
            }
        })
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from environment variables over defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_builder(AppConfigBuilder::default())
    }

    /// Configuration from explicit builder values over environment and defaults
    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.or(env_builder()?).build()?;
        Ok(Self { app })
    }

    /// Configuration from a TOML file over environment and defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::with_builder(AppConfigBuilder::from_toml(&text)?)
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    pub fn refresh_interval(&self) -> Duration {
        self.app.refresh_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.app.request_timeout
    }

    pub fn storage_key(&self) -> &str {
        &self.app.storage_key
    }

    /// SQLite file for the persisted snapshot.
    ///
    /// Falls back to the platform data directory when not configured.
    pub fn database_path(&self) -> PathBuf {
        self.app.database_path.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push("chatsync");
            path.push("local.db");
            path
        })
    }
}

fn env_builder() -> Result<AppConfigBuilder, ConfigError> {
    let mut builder = AppConfigBuilder::default();
    if let Ok(url) = std::env::var("CHAT_API_URL") {
        builder = builder.server_url(url);
    }
    if let Ok(secs) = std::env::var("CHAT_REFRESH_SECS") {
        let secs = secs
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("CHAT_REFRESH_SECS must be an integer"))?;
        builder = builder.refresh_interval_secs(secs);
    }
    if let Ok(path) = std::env::var("CHAT_DB_PATH") {
        builder = builder.database_path(path);
    }
    Ok(builder)
}
