//! Live/historical selection for the meter pages.

use std::sync::Arc;

use meter_core::selection::EncounterSelection;
use meter_core::store::StateStore;
use tokio::sync::watch;

/// Holds which encounter the meter pages show.
///
/// The selection itself is persisted; the live fallback id is not. Live pages
/// set the fallback when there is no active combat and they show the most
/// recent saved encounter instead, without touching the user's selection.
#[derive(Clone)]
pub struct EncounterSelectionService {
    store: Arc<dyn StateStore<EncounterSelection>>,
    live_fallback: Arc<watch::Sender<Option<i64>>>,
}

impl EncounterSelectionService {
    pub fn new(store: Arc<dyn StateStore<EncounterSelection>>) -> Self {
        let (live_fallback, _) = watch::channel(None);
        Self {
            store,
            live_fallback: Arc::new(live_fallback),
        }
    }

    /// Current selection; `Live` when the store cannot be read.
    pub fn current(&self) -> EncounterSelection {
        self.store.state().unwrap_or_else(|e| {
            tracing::warn!(key = self.store.key(), error = %e, "Failed to read encounter selection");
            EncounterSelection::Live
        })
    }

    pub fn select_live(&self) {
        self.set(EncounterSelection::Live);
    }

    pub fn select_historical(&self, encounter_id: i64) {
        self.set(EncounterSelection::Historical { encounter_id });
    }

    pub fn set_live_fallback(&self, encounter_id: Option<i64>) {
        self.live_fallback.send_replace(encounter_id);
    }

    pub fn live_fallback(&self) -> Option<i64> {
        *self.live_fallback.borrow()
    }

    pub fn subscribe_live_fallback(&self) -> watch::Receiver<Option<i64>> {
        self.live_fallback.subscribe()
    }

    fn set(&self, selection: EncounterSelection) {
        if let Err(e) = self.store.set_state(selection) {
            tracing::warn!(key = self.store.key(), error = %e, "Failed to persist encounter selection");
        }
    }
}
