//! Configuration service implementation.
//!
//! Loads the runtime configuration from `config.toml` in the meter config
//! directory and caches it.

use std::fs;
use std::sync::{Arc, PoisonError, RwLock};

use meter_core::config::RuntimeConfig;
use meter_core::error::{MeterError, Result};

use crate::paths::MeterPaths;

/// Configuration service that loads and caches the runtime configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: MeterPaths,
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<RuntimeConfig>>>,
}

impl ConfigService {
    /// The configuration is loaded lazily on first access.
    pub fn new(paths: MeterPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the runtime configuration, loading from file if not cached.
    ///
    /// A missing file is created with the defaults. An unreadable or
    /// malformed file is logged and the defaults are used without touching it.
    pub fn get_config(&self) -> RuntimeConfig {
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config.toml; using defaults");
            RuntimeConfig::default()
        });

        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    fn load_config(&self) -> Result<RuntimeConfig> {
        let config_path = self
            .paths
            .config_file()
            .map_err(|e| MeterError::config(e.to_string()))?;

        if !config_path.exists() {
            let default_config = RuntimeConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, toml::to_string_pretty(&default_config)?)?;
            tracing::info!(path = %config_path.display(), "Wrote default config.toml");
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(toml::from_str(&content)?)
    }
}
