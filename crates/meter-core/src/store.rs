//! Key-addressed persistent value store abstraction.
//!
//! A store owns one value under one key. Reads are synchronous and may
//! return the default until the store has finished loading its persisted
//! copy; writes replace the value and, depending on [`StoreOptions`], are
//! persisted in the background.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use crate::error::Result;

/// Construction options for persistent stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Begin loading the persisted value as soon as the store is created.
    pub auto_start: bool,
    /// Persist the value on every `set_state`.
    pub save_on_change: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            auto_start: true,
            save_on_change: true,
        }
    }
}

/// A single persisted value addressed by key.
pub trait StateStore<T>: Send + Sync {
    /// Key the value is persisted under.
    fn key(&self) -> &str;

    /// Current value. Before loading completes this is the default value.
    fn state(&self) -> Result<T>;

    /// Replaces the current value.
    ///
    /// Persistence may complete after this returns.
    fn set_state(&self, value: T) -> Result<()>;

    /// One-shot signal that flips to `true` once the initial load finished,
    /// successfully or not. Stores without an asynchronous load return `None`.
    fn loaded(&self) -> Option<watch::Receiver<bool>> {
        None
    }
}

/// In-process store with no persistence.
///
/// Used where a value only needs to live for the session and as the store
/// double in tests.
#[derive(Debug)]
pub struct MemoryStore<T> {
    key: String,
    value: RwLock<T>,
}

impl<T: Clone + Send + Sync> MemoryStore<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value: RwLock::new(value),
        }
    }

    pub fn shared(key: impl Into<String>, value: T) -> Arc<Self> {
        Arc::new(Self::new(key, value))
    }
}

impl<T: Clone + Send + Sync> StateStore<T> for MemoryStore<T> {
    fn key(&self) -> &str {
        &self.key
    }

    fn state(&self) -> Result<T> {
        Ok(self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set_state(&self, value: T) -> Result<()> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new("misc", 1u32);
        assert_eq!(store.key(), "misc");
        assert_eq!(store.state().unwrap(), 1);

        store.set_state(5).unwrap();
        assert_eq!(store.state().unwrap(), 5);
        assert!(store.loaded().is_none());
    }

    #[test]
    fn test_default_options_start_and_save() {
        let options = StoreOptions::default();
        assert!(options.auto_start);
        assert!(options.save_on_change);
    }
}
