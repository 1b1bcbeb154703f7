//! Persistence for the process-wide [`ServerConfig`].
//!
//! Loaded once at start-up and rewritten whenever an administrator saves
//! new settings. Writers are serialized by the host.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use crate::error::CoreError;

/// Load/save access to the stored [`ServerConfig`].
pub trait SettingsStore {
    /// Read the stored configuration, falling back to the default when
    /// nothing has been saved yet.
    fn load(&self) -> Result<ServerConfig, CoreError>;

    /// Replace the stored configuration.
    fn save(&self, config: &ServerConfig) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Stores the configuration as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> CoreError {
        CoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Sibling file the new contents are written to before the rename.
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<ServerConfig, CoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ServerConfig::default()),
            Err(e) => return Err(self.io_error(e)),
        };

        let config: ServerConfig =
            serde_json::from_str(&raw).map_err(|source| CoreError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        config.check()?;
        Ok(config)
    }

    fn save(&self, config: &ServerConfig) -> Result<(), CoreError> {
        config.check()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(config).map_err(|source| CoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let staging = self.staging_path();
        fs::write(&staging, json).map_err(|e| self.io_error(e))?;
        fs::rename(&staging, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }
}
