//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] for the host build.  The file path comes from
//! the `ROOMLIGHT_CONFIG` environment variable; an unset variable or a
//! missing file is [`ConfigError::NotFound`] so the caller falls back to
//! defaults.  A present-but-broken file is an error, never silently ignored.

use std::path::{Path, PathBuf};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "ROOMLIGHT_CONFIG";

#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    path: Option<PathBuf>,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path taken from [`CONFIG_ENV_VAR`], if set.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigPort for FileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NotFound)?;
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound);
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };
        SystemConfig::from_json(&text)
    }
}
