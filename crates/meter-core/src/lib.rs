//! Domain layer for the combat meter client.
//!
//! Models, the shared error type and the traits behind which persistence,
//! the desktop shell and the native backend sit. Nothing here performs I/O.

pub mod config;
pub mod error;
pub mod history;
pub mod host;
pub mod player;
pub mod selection;
pub mod settings;
pub mod shortcut;
pub mod store;

// Re-export common error type
pub use error::{MeterError, Result};
pub use store::{MemoryStore, StateStore, StoreOptions};
