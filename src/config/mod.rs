mod credentials;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub use credentials::{is_valid_key, masked, Credentials};

use crate::constants::*;
use crate::error::ConfigError;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/graveyard/config.toml
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Refresh interval in milliseconds
    pub refresh_interval_ms: u64,
    /// Deadline for a single AI inspection (seconds)
    pub inspect_timeout_secs: u64,
    /// Deadline for scan + follow-up analysis (seconds)
    pub scan_timeout_secs: u64,
    /// Ranked process list length
    pub max_processes: usize,
    /// Gemini model identifier
    pub gemini_model: String,
    /// Log file path
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_MS,
            inspect_timeout_secs: DEFAULT_INSPECT_TIMEOUT_SECS,
            scan_timeout_secs: DEFAULT_SCAN_TIMEOUT_SECS,
            max_processes: DEFAULT_MAX_PROCESSES,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    refresh_interval_ms: Option<u64>,
    inspect_timeout_secs: Option<u64>,
    scan_timeout_secs: Option<u64>,
    max_processes: Option<usize>,
    gemini_model: Option<String>,
    log_file: Option<PathBuf>,
}

impl Config {
    /// Load config from `path`, falling back to defaults for any missing
    /// fields. A missing file yields pure defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Config::default().merged(file_config))
    }

    /// Merge file values over defaults
    fn merged(mut self, file: FileConfig) -> Self {
        if let Some(v) = file.refresh_interval_ms {
            self.refresh_interval_ms = v.max(MIN_REFRESH_MS);
        }
        if let Some(v) = file.inspect_timeout_secs {
            self.inspect_timeout_secs = v.max(1);
        }
        if let Some(v) = file.scan_timeout_secs {
            self.scan_timeout_secs = v.max(1);
        }
        if let Some(v) = file.max_processes {
            self.max_processes = v.max(1);
        }
        if let Some(v) = file.gemini_model {
            if !v.trim().is_empty() {
                self.gemini_model = v;
            }
        }
        if let Some(v) = file.log_file {
            if !v.as_os_str().is_empty() {
                self.log_file = v;
            }
        }
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn inspect_timeout(&self) -> Duration {
        Duration::from_secs(self.inspect_timeout_secs)
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }
}
