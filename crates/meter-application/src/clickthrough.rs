use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use meter_core::error::Result;
use meter_core::host::WindowHost;
use meter_core::shortcut::LIVE_WINDOW;

/// Cursor pass-through state of the live window.
///
/// The flag only changes once the host accepted the new setting.
pub struct ClickthroughController {
    windows: Arc<dyn WindowHost>,
    enabled: AtomicBool,
}

impl ClickthroughController {
    pub fn new(windows: Arc<dyn WindowHost>) -> Self {
        Self {
            windows,
            enabled: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub async fn set(&self, enabled: bool) -> Result<()> {
        self.windows
            .set_ignore_cursor_events(LIVE_WINDOW, enabled)
            .await?;
        self.enabled.store(enabled, Ordering::Release);
        tracing::debug!(enabled, "Click-through updated");
        Ok(())
    }

    /// Flips the flag and returns the new value.
    pub async fn toggle(&self) -> Result<bool> {
        let enabled = !self.is_enabled();
        self.set(enabled).await?;
        Ok(enabled)
    }
}
