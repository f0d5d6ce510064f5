//! API keys stored as `KEY=value` lines in a local `.env` file.
//!
//! Process environment variables win over the file. Saving one key rewrites
//! the file with both keys so the other one is never lost.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::{GEMINI_KEY_VAR, KEY_MASK_VISIBLE, VIRUSTOTAL_KEY_VAR};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    path: PathBuf,
    gemini: Option<String>,
    virustotal: Option<String>,
}

impl Credentials {
    /// Load from `path`, then apply process environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut creds = Credentials::empty(path);

        if path.exists() {
            let iter = dotenvy::from_path_iter(path).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| ConfigError::Parse {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                creds.assign(&key, value);
            }
        }

        for key in [GEMINI_KEY_VAR, VIRUSTOTAL_KEY_VAR] {
            if let Some(value) = env(key) {
                creds.assign(key, value);
            }
        }
        Ok(creds)
    }

    fn assign(&mut self, key: &str, value: String) {
        let value = Some(value).filter(|v| is_valid_key(v));
        match key {
            GEMINI_KEY_VAR => self.gemini = value,
            VIRUSTOTAL_KEY_VAR => self.virustotal = value,
            _ => {}
        }
    }

    /// No keys, saving to `path`.
    pub fn empty(path: &Path) -> Self {
        Credentials {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    pub fn gemini_key(&self) -> Option<&str> {
        self.gemini.as_deref()
    }

    pub fn virustotal_key(&self) -> Option<&str> {
        self.virustotal.as_deref()
    }

    pub fn save_gemini_key(&mut self, key: &str) -> Result<(), ConfigError> {
        self.gemini = Some(key.trim().to_string());
        self.persist()?;
        info!("Gemini API key saved to {}", self.path.display());
        Ok(())
    }

    pub fn save_virustotal_key(&mut self, key: &str) -> Result<(), ConfigError> {
        self.virustotal = Some(key.trim().to_string());
        self.persist()?;
        info!("VirusTotal API key saved to {}", self.path.display());
        Ok(())
    }

    /// Delete the credentials file and forget both keys.
    pub fn clear(&mut self) -> Result<(), ConfigError> {
        self.gemini = None;
        self.virustotal = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }
        info!("API keys cleared");
        Ok(())
    }

    fn persist(&self) -> Result<(), ConfigError> {
        let mut content = String::new();
        if let Some(key) = &self.gemini {
            content.push_str(&format!("{}={}\n", GEMINI_KEY_VAR, key));
        }
        if let Some(key) = &self.virustotal {
            content.push_str(&format!("{}={}\n", VIRUSTOTAL_KEY_VAR, key));
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            // Applies only when the file is created
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // An existing file keeps its old mode; tighten it before writing keys
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }
        file.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// A key is usable if it has any non-whitespace content.
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// First few characters followed by `...`, for prefilling the settings form.
pub fn masked(key: &str) -> String {
    let visible: String = key.chars().take(KEY_MASK_VISIBLE).collect();
    format!("{}...", visible)
}
