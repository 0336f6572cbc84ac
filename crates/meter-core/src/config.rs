//! Runtime configuration read from `config.toml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub history: ReconcileSettings,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            history: ReconcileSettings::default(),
        }
    }
}

/// How long the history cache waits for its store to load at startup.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ReconcileSettings {
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            max_poll_attempts: 10,
        }
    }
}

impl ReconcileSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Total time budget: interval times attempts.
    pub fn window(&self) -> Duration {
        self.poll_interval() * self.max_poll_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_half_a_second() {
        assert_eq!(ReconcileSettings::default().window(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: RuntimeConfig = toml::from_str("[history]\npoll_interval_ms = 20\n").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.history.poll_interval_ms, 20);
        assert_eq!(config.history.max_poll_attempts, 10);
    }
}
