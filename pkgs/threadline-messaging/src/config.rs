//! Client configuration
//!
//! Resolution order: defaults, then the JSON config file, then environment
//! variables. Command-line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use threadline_store::UserId;
use tracing::{debug, info};

use crate::error::MessagingError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_READ_REFRESH_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration of the messaging client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/api`
    pub base_url: String,

    /// Bearer token; `None` sends anonymous requests
    pub access_token: Option<String>,

    /// Id of the authenticated user, used to tell incoming from outgoing messages
    pub local_user_id: UserId,

    /// Period of the synchronization loop (default: 5s)
    pub poll_interval: Duration,

    /// Quiet time after the last keystroke before a search is issued (default: 300ms)
    pub search_debounce: Duration,

    /// Wait between mark-as-read and the counter refresh (default: 300ms)
    pub read_refresh_delay: Duration,

    /// Per-request HTTP timeout (default: 30s)
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            local_user_id: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            read_refresh_delay: DEFAULT_READ_REFRESH_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// On-disk representation; every field is optional and durations are milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_refresh_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl FileConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("threadline")
            .join("config.json")
    }

    /// Load a config file; a missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, MessagingError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        let cfg: FileConfig = serde_json::from_str(&data)?;
        Ok(Some(cfg))
    }

    pub fn save(&self, path: &Path) -> Result<(), MessagingError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

impl ClientConfig {
    /// Defaults, overlaid with the config file at `path` (or the default
    /// location) and then with the process environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self, MessagingError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(FileConfig::default_path);
        let mut config = Self::default();
        match FileConfig::load(&path)? {
            Some(file) => {
                info!("Config loaded from {}", path.display());
                config.apply_file(&file);
            }
            None => debug!("No config file at {}", path.display()),
        }
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(url) = &file.base_url {
            self.base_url = url.clone();
        }
        if let Some(token) = &file.access_token {
            self.access_token = Some(token.clone());
        }
        if let Some(id) = file.local_user_id {
            self.local_user_id = id;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.search_debounce_ms {
            self.search_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = file.read_refresh_delay_ms {
            self.read_refresh_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.request_timeout_ms {
            self.request_timeout = Duration::from_millis(ms);
        }
    }

    /// Apply `THREADLINE_*` variables read through `lookup`.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), MessagingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("THREADLINE_API_URL") {
            self.base_url = url;
        }
        if let Some(token) = lookup("THREADLINE_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(id) = lookup("THREADLINE_USER_ID") {
            self.local_user_id = id.trim().parse().map_err(|_| {
                MessagingError::Config(format!("THREADLINE_USER_ID is not a user id: {id}"))
            })?;
        }
        if let Some(secs) = lookup("THREADLINE_POLL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                MessagingError::Config(format!("THREADLINE_POLL_SECS is not a number: {secs}"))
            })?;
            self.poll_interval = Duration::from_secs(secs);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), MessagingError> {
        if self.base_url.trim().is_empty() {
            return Err(MessagingError::Config("base_url is empty".to_string()));
        }
        if self.poll_interval.is_zero() {
            return Err(MessagingError::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
