use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use meter_core::config::ReconcileSettings;
use meter_core::history::{
    DEFAULT_MAX_ENCOUNTERS, Encounter, HistoryState, SelectedEncounter, SelectedId,
    effective_limit,
};
use meter_core::settings::HistorySettings;
use meter_core::store::StateStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::id::EncounterIdGenerator;
use super::reconcile::{ReconcileOutcome, reconcile};

/// Store holding the persisted history.
pub type HistoryStore<T> = Arc<dyn StateStore<HistoryState<T>>>;

/// Store the history limit is read from on every push.
pub type HistoryLimits = Arc<dyn StateStore<HistorySettings>>;

struct Inner<T> {
    state: watch::Sender<HistoryState<T>>,
    store: HistoryStore<T>,
    limits: HistoryLimits,
    ids: EncounterIdGenerator,
    /// Serializes mutations against adoption of the store's value.
    guard: Mutex<()>,
    adopted: AtomicBool,
    /// The loaded store has been read; mutations are written through.
    synced: AtomicBool,
    /// A mutation happened before adoption.
    dirty: AtomicBool,
    /// `clear_history` ran before adoption.
    cleared: AtomicBool,
}

/// Bounded, newest-first encounter history with a "currently viewed" pointer.
///
/// The in-memory value is the read model for the UI and is always available.
/// Mutations are written through to the backing store once it has loaded;
/// before that they stay in memory and are merged in front of the persisted
/// history when it shows up (see [`EncounterHistory::spawn_reconcile`]).
/// Store failures are logged and never surface to callers.
///
/// Cloning is cheap and every clone shares the same state.
pub struct EncounterHistory<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for EncounterHistory<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> EncounterHistory<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates the history with an empty value and adopts the store's
    /// current value right away if it has loaded and holds encounters.
    pub fn new(store: HistoryStore<T>, limits: HistoryLimits) -> Self {
        let (state, _) = watch::channel(HistoryState::default());
        let history = Self {
            inner: Arc::new(Inner {
                state,
                store,
                limits,
                ids: EncounterIdGenerator::new(),
                guard: Mutex::new(()),
                adopted: AtomicBool::new(false),
                synced: AtomicBool::new(false),
                dirty: AtomicBool::new(false),
                cleared: AtomicBool::new(false),
            }),
        };
        history.try_adopt();
        history
    }

    /// Starts the background task that waits for the store to load and
    /// adopts its value once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_reconcile(&self, settings: ReconcileSettings) -> JoinHandle<ReconcileOutcome> {
        tokio::spawn(reconcile(self.clone(), settings))
    }

    /// Receiver notified on every change; the UI derives its views from it.
    pub fn subscribe(&self) -> watch::Receiver<HistoryState<T>> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> HistoryState<T> {
        self.inner.state.borrow().clone()
    }

    pub fn encounters(&self) -> Vec<Encounter<T>> {
        self.inner.state.borrow().encounters.clone()
    }

    pub fn selected_encounter_id(&self) -> SelectedId {
        self.inner.state.borrow().selected_id.clone()
    }

    pub fn selected_encounter(&self) -> SelectedEncounter<T> {
        self.inner.state.borrow().selected_encounter()
    }

    /// Records `snapshot` as the newest encounter.
    ///
    /// Returns the new id, or `None` when the history limit could not be read.
    /// The selection is left unchanged.
    pub fn push_encounter(&self, snapshot: T) -> Option<String> {
        let max = match self.inner.limits.state() {
            Ok(limits) => effective_limit(limits.max_encounters),
            Err(e) => {
                tracing::warn!(error = %e, "push_encounter: failed to read history limit");
                return None;
            }
        };

        let timestamp = chrono::Utc::now().timestamp_millis();
        let id = self.inner.ids.next_id(timestamp);
        let encounter = Encounter {
            id: id.clone(),
            timestamp,
            data: snapshot,
        };

        self.mutate(false, |state| state.push(encounter, max));
        tracing::debug!(id = %id, max, "Encounter pushed to history");
        Some(id)
    }

    /// Points the UI at `id`. Existence is checked when reading.
    pub fn select_encounter(&self, id: impl Into<SelectedId>) {
        let id = id.into();
        self.mutate(false, |state| state.select(id));
    }

    pub fn clear_history(&self) {
        self.mutate(true, HistoryState::clear);
    }

    pub(crate) fn is_adopted(&self) -> bool {
        self.inner.adopted.load(Ordering::Acquire)
    }

    pub(crate) fn store_loaded_signal(&self) -> Option<watch::Receiver<bool>> {
        self.inner.store.loaded()
    }

    /// Adopts the store's value if it has loaded and holds encounters,
    /// merging changes made in the meantime. Only the first successful
    /// adoption applies.
    pub(crate) fn try_adopt(&self) -> bool {
        let _guard = self.lock();
        self.adopt_locked()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner
            .guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores without a load signal are read as they are.
    fn store_ready(&self) -> bool {
        self.inner
            .store
            .loaded()
            .is_none_or(|loaded| *loaded.borrow())
    }

    fn adopt_locked(&self) -> bool {
        if self.is_adopted() {
            return true;
        }
        if !self.store_ready() {
            return false;
        }

        let mut persisted = match self.inner.store.state() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    key = self.inner.store.key(),
                    error = %e,
                    "Failed to read encounter history store"
                );
                return false;
            }
        };

        let first_read = !self.inner.synced.swap(true, Ordering::AcqRel);
        let dirty = self.inner.dirty.load(Ordering::Acquire);
        if persisted.is_empty() {
            if first_read && dirty {
                self.write_through();
            }
            return false;
        }

        let dropped = persisted.dedup_ids();
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped duplicate encounter ids from persisted history");
        }

        let next = if !dirty {
            persisted
        } else if self.inner.cleared.load(Ordering::Acquire) {
            self.snapshot()
        } else {
            let max = self
                .inner
                .limits
                .state()
                .map(|limits| limits.max_encounters)
                .unwrap_or(DEFAULT_MAX_ENCOUNTERS);
            self.snapshot().merge_onto(persisted, max)
        };

        let count = next.encounters.len();
        self.inner.state.send_replace(next);
        self.inner.adopted.store(true, Ordering::Release);
        tracing::info!(count, merged = dirty, "Adopted persisted encounter history");
        if dirty {
            self.write_through();
        }
        true
    }

    /// `clears` marks a change that drops the whole list.
    fn mutate(&self, clears: bool, f: impl FnOnce(&mut HistoryState<T>)) {
        let _guard = self.lock();
        self.inner.state.send_modify(f);

        if !self.is_adopted() {
            self.inner.dirty.store(true, Ordering::Release);
            if clears {
                self.inner.cleared.store(true, Ordering::Release);
            }
        }

        if self.inner.synced.load(Ordering::Acquire) {
            self.write_through();
        } else if !self.adopt_locked() && !self.inner.synced.load(Ordering::Acquire) {
            tracing::debug!("History store not loaded yet; keeping change in memory");
        }
    }

    fn write_through(&self) {
        let value = self.snapshot();
        if let Err(e) = self.inner.store.set_state(value) {
            tracing::warn!(
                key = self.inner.store.key(),
                error = %e,
                "Failed to persist encounter history"
            );
        }
    }
}
