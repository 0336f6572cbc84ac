//! Traits for the native shell and backend collaborators.
//!
//! The webview shell owns windows and OS-level shortcut hooks; the native
//! backend owns the live encounter. Both are reached through these traits so
//! the client state can be driven and tested without either.

use async_trait::async_trait;

use crate::error::Result;
use crate::shortcut::ShortcutCommand;

/// Window operations exposed by the desktop shell.
#[async_trait]
pub trait WindowHost: Send + Sync {
    /// `Ok(None)` when no window with `label` exists.
    async fn is_visible(&self, label: &str) -> Result<Option<bool>>;

    async fn show(&self, label: &str) -> Result<()>;

    async fn hide(&self, label: &str) -> Result<()>;

    /// Let mouse input pass through the window when `ignore` is true.
    async fn set_ignore_cursor_events(&self, label: &str, ignore: bool) -> Result<()>;

    /// Emits `event` with a string payload to a single window.
    async fn emit_to(&self, label: &str, event: &str, payload: &str) -> Result<()>;
}

/// OS global shortcut registration.
///
/// The host is expected to call back into the shortcut registry's
/// `dispatch` with the registered command whenever the accelerator fires.
#[async_trait]
pub trait GlobalShortcutHost: Send + Sync {
    async fn unregister_all(&self) -> Result<()>;

    async fn register(&self, accelerator: &str, command: ShortcutCommand) -> Result<()>;
}

/// Encounter lifecycle commands served by the native backend.
#[async_trait]
pub trait EncounterCommands: Send + Sync {
    async fn reset_encounter(&self) -> Result<()>;

    async fn hard_reset(&self) -> Result<()>;
}
