use std::{
    env,
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{Level, info, warn};

use crate::error::{PortalError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "portal.toml";

/// Runtime settings, read from an optional TOML file and then overridden by
/// `PORTAL_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub state_dir: PathBuf,
    pub download_dir: PathBuf,
    pub toast_capacity: usize,
    pub toast_ttl_secs: u64,
    pub connect_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".into(),
            state_dir: PathBuf::from(".portal"),
            download_dir: PathBuf::from("."),
            toast_capacity: 8,
            toast_ttl_secs: 5,
            connect_timeout_secs: 10,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Loads the configuration file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match read_to_string(path) {
            Ok(raw) => {
                info!("Loading configuration from {}", path.display());
                toml::from_str::<Config>(&raw)
                    .map_err(|e| PortalError::Config(format!("{}: {e}", path.display())))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, using default configuration", path.display());
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    /// Applies environment overrides. `lookup` stands in for `std::env::var`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(api_url) = lookup("PORTAL_API_URL") {
            info!("PORTAL_API_URL set, using {api_url}");
            self.api_url = api_url;
        }
        if let Some(state_dir) = lookup("PORTAL_STATE_DIR") {
            info!("PORTAL_STATE_DIR set, using {state_dir}");
            self.state_dir = PathBuf::from(state_dir);
        }
        if let Some(log_level) = lookup("PORTAL_LOG_LEVEL") {
            self.log_level = log_level;
        }
    }

    pub fn max_level(&self) -> Level {
        self.log_level.parse().unwrap_or_else(|_| {
            warn!("Invalid log level {}, using INFO", self.log_level);
            Level::INFO
        })
    }

    /// The API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}
