//! File-backed key/value store.
//!
//! Each store owns one `<key>.json` file. The value is readable immediately
//! (the default until loading finishes), loads in the background when
//! `auto_start` is set, and is written back on every change when
//! `save_on_change` is set.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use meter_core::error::{MeterError, Result};
use meter_core::store::{StateStore, StoreOptions};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::{Mutex, watch};

use super::atomic_json::AtomicJsonFile;
use crate::paths::MeterPaths;

struct Slot<T> {
    value: T,
    /// Set once `set_state` ran; a later load must not clobber the local value.
    written: bool,
}

struct Inner<T> {
    key: String,
    file: AtomicJsonFile<T>,
    options: StoreOptions,
    slot: RwLock<Slot<T>>,
    loaded_tx: watch::Sender<bool>,
    /// Serializes file writes so the last one always carries the newest value.
    save_lock: Mutex<()>,
}

/// JSON file store for a single value.
///
/// Cloning is cheap and every clone shares the same value and file.
pub struct JsonFileStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a store backed by `path`.
    ///
    /// With `auto_start` the load is spawned on the current tokio runtime;
    /// outside a runtime the caller has to run [`JsonFileStore::start`].
    pub fn new(key: impl Into<String>, default: T, path: PathBuf, options: StoreOptions) -> Self {
        let (loaded_tx, _) = watch::channel(false);
        let store = Self {
            inner: Arc::new(Inner {
                key: key.into(),
                file: AtomicJsonFile::new(path),
                options,
                slot: RwLock::new(Slot {
                    value: default,
                    written: false,
                }),
                loaded_tx,
                save_lock: Mutex::new(()),
            }),
        };

        if options.auto_start {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let loader = store.clone();
                    handle.spawn(async move {
                        loader.start().await;
                    });
                }
                Err(_) => tracing::warn!(
                    key = %store.inner.key,
                    "No async runtime; store will not load until start() is called"
                ),
            }
        }

        store
    }

    /// Creates the store for `key` under the configured stores directory.
    pub fn open(
        paths: &MeterPaths,
        key: impl Into<String>,
        default: T,
        options: StoreOptions,
    ) -> Result<Self> {
        let key = key.into();
        let path = paths
            .store_file(&key)
            .map_err(|e| MeterError::config(e.to_string()))?;
        Ok(Self::new(key, default, path, options))
    }

    pub fn path(&self) -> &std::path::Path {
        self.inner.file.path()
    }

    pub fn is_loaded(&self) -> bool {
        *self.inner.loaded_tx.borrow()
    }

    /// Loads the persisted value and signals completion.
    ///
    /// Returns `true` when a persisted value replaced the in-memory one. A
    /// missing file, a malformed file or a local write made before the load
    /// finished all leave the in-memory value in place.
    pub async fn start(&self) -> bool {
        if self.is_loaded() {
            return false;
        }

        let file = self.inner.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load()).await;

        let adopted = match loaded {
            Ok(Ok(Some(value))) => {
                let mut slot = self.inner.slot.write().unwrap_or_else(PoisonError::into_inner);
                if slot.written {
                    tracing::debug!(key = %self.inner.key, "Local write made before load; keeping it");
                    false
                } else {
                    slot.value = value;
                    true
                }
            }
            Ok(Ok(None)) => {
                tracing::debug!(key = %self.inner.key, "No persisted value; using default");
                false
            }
            Ok(Err(e)) if e.is_malformed() => {
                tracing::warn!(
                    key = %self.inner.key,
                    error = %e,
                    "Malformed persisted value; falling back to default"
                );
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(key = %self.inner.key, error = %e, "Failed to load store");
                false
            }
            Err(e) => {
                tracing::warn!(key = %self.inner.key, error = %e, "Store load task failed");
                false
            }
        };

        self.inner.loaded_tx.send_replace(true);
        adopted
    }

    /// Writes the current value to disk.
    pub async fn save(&self) -> Result<()> {
        let _guard = self.inner.save_lock.lock().await;
        let value = self.snapshot();
        let file = self.inner.file.clone();
        tokio::task::spawn_blocking(move || file.save(&value))
            .await
            .map_err(|e| MeterError::internal(format!("Failed to join save task: {}", e)))??;
        Ok(())
    }

    fn snapshot(&self) -> T {
        self.inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }

    fn schedule_save(&self, value: &T) -> Result<()> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn(async move {
                    if let Err(e) = store.save().await {
                        tracing::warn!(key = %store.inner.key, error = %e, "Failed to persist store");
                    }
                });
                Ok(())
            }
            // Without a runtime there is nothing to hand the write to
            Err(_) => self.inner.file.save(value).map_err(MeterError::from),
        }
    }
}

impl<T> StateStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn key(&self) -> &str {
        &self.inner.key
    }

    fn state(&self) -> Result<T> {
        Ok(self.snapshot())
    }

    fn set_state(&self, value: T) -> Result<()> {
        {
            let mut slot = self.inner.slot.write().unwrap_or_else(PoisonError::into_inner);
            slot.value = value.clone();
            slot.written = true;
        }

        if self.inner.options.save_on_change {
            self.schedule_save(&value)?;
        }
        Ok(())
    }

    fn loaded(&self) -> Option<watch::Receiver<bool>> {
        Some(self.inner.loaded_tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    const MANUAL: StoreOptions = StoreOptions {
        auto_start: false,
        save_on_change: true,
    };

    fn store_in(temp_dir: &TempDir, options: StoreOptions) -> JsonFileStore<Counter> {
        let paths = MeterPaths::new(Some(temp_dir.path()));
        JsonFileStore::open(&paths, "counter", Counter { count: 0 }, options).unwrap()
    }

    #[tokio::test]
    async fn test_start_adopts_persisted_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, MANUAL);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{ "count": 7 }"#).unwrap();

        assert_eq!(store.state().unwrap().count, 0);
        assert!(store.start().await);
        assert_eq!(store.state().unwrap().count, 7);
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_malformed_file_keeps_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, MANUAL);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(!store.start().await);
        assert_eq!(store.state().unwrap(), Counter { count: 0 });
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_write_before_load_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(
            &temp_dir,
            StoreOptions {
                auto_start: false,
                save_on_change: false,
            },
        );
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{ "count": 7 }"#).unwrap();

        store.set_state(Counter { count: 3 }).unwrap();
        assert!(!store.start().await);
        assert_eq!(store.state().unwrap().count, 3);
    }

    #[tokio::test]
    async fn test_save_on_change_persists_latest_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, MANUAL);

        for count in 1..=5 {
            store.set_state(Counter { count }).unwrap();
        }
        store.save().await.unwrap();

        let on_disk = AtomicJsonFile::<Counter>::new(store.path().to_path_buf())
            .load()
            .unwrap();
        assert_eq!(on_disk, Some(Counter { count: 5 }));
    }

    #[tokio::test]
    async fn test_auto_start_signals_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MeterPaths::new(Some(temp_dir.path()));
        let file = AtomicJsonFile::<Counter>::new(paths.store_file("counter").unwrap());
        file.save(&Counter { count: 9 }).unwrap();

        let store = store_in(&temp_dir, StoreOptions::default());
        let mut loaded = store.loaded().unwrap();
        loaded.wait_for(|done| *done).await.unwrap();

        assert_eq!(store.state().unwrap().count, 9);
    }

    #[test]
    fn test_set_state_without_runtime_saves_synchronously() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir, MANUAL);

        store.set_state(Counter { count: 4 }).unwrap();

        let on_disk = AtomicJsonFile::<Counter>::new(store.path().to_path_buf())
            .load()
            .unwrap();
        assert_eq!(on_disk, Some(Counter { count: 4 }));
    }
}
