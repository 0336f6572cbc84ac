//! Unified path management for meter files.
//!
//! The config directory is resolved via `AppPaths` from the version-migrate
//! crate unless a base directory is supplied (tests, portable installs).

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Path layout for the meter client.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/meter/             # Config directory (AppPaths default)
/// ├── config.toml              # Runtime configuration
/// ├── stores/                  # One JSON file per store key
/// │   ├── encounterHistory.json
/// │   ├── general.json
/// │   └── ...
/// └── logs/                    # Application logs
///     └── meter.log.YYYY-MM-DD
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeterPaths {
    base_dir: Option<PathBuf>,
}

impl MeterPaths {
    /// `base_dir` overrides the platform config directory.
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new("meter")
    }

    /// Returns the meter configuration directory (e.g. `~/.config/meter/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding the `<key>.json` store files.
    pub fn stores_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("stores"))
    }

    pub fn store_file(&self, key: &str) -> Result<PathBuf, PathError> {
        Ok(self.stores_dir()?.join(format!("{}.json", key)))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}
