//! Optional RON configuration for the shell.
//!
//! Missing keys fall back to defaults. A missing file is only an error when
//! the path was given explicitly.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reportwatch_engine::{ClientSettings, DEFAULT_BASE_URL};
use reportwatch_logging::{watch_debug, watch_info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILENAME: &str = "reportwatch.ron";
pub const MAX_POLL_INTERVAL_SECS: u64 = 60 * 60;
pub const MAX_TIMEOUT_SECS: u64 = 10 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub poll_interval_secs: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: settings.poll_interval.as_secs(),
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` if given, else `./reportwatch.ron` when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    watch_debug!("No {} found, using defaults", DEFAULT_CONFIG_FILENAME);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        watch_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        if self.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
            return Err(ConfigError::Invalid(format!(
                "poll_interval_secs must be at most {MAX_POLL_INTERVAL_SECS}"
            )));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be at least 1 second".into()));
        }
        if self.request_timeout_secs > MAX_TIMEOUT_SECS || self.connect_timeout_secs > MAX_TIMEOUT_SECS
        {
            return Err(ConfigError::Invalid(format!(
                "timeouts must be at most {MAX_TIMEOUT_SECS} seconds"
            )));
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.trim().to_string(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}
