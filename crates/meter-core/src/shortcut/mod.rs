//! Global shortcut domain.

pub mod model;

pub use model::{LIVE_WINDOW, NAVIGATE_EVENT, ShortcutAction, ShortcutCommand, ShortcutState};
