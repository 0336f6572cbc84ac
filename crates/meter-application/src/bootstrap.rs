//! Composition root for the meter client state.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use meter_core::config::RuntimeConfig;
use meter_core::history::{ENCOUNTER_HISTORY_KEY, HistoryState};
use meter_core::selection::{EncounterSelection, SELECTED_ENCOUNTER_KEY};
use meter_core::store::{StateStore, StoreOptions};
use meter_infrastructure::{ConfigService, JsonFileStore, MeterPaths, SettingsStores};
use tokio::task::JoinHandle;
use tracing_appender::non_blocking::WorkerGuard;

use crate::history::{EncounterHistory, ReconcileOutcome};
use crate::logging::init_tracing;
use crate::selection::EncounterSelectionService;
use crate::shortcut_registry::ShortcutRegistry;

/// Snapshot type recorded per encounter; opaque to this crate.
pub type EncounterSnapshot = serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct MeterOptions {
    /// Overrides the platform config directory.
    pub base_dir: Option<PathBuf>,
    /// Install the global tracing subscriber.
    pub init_tracing: bool,
}

/// Wired-up client state.
pub struct MeterApp {
    pub paths: MeterPaths,
    pub config: RuntimeConfig,
    pub settings: SettingsStores,
    pub history_store: JsonFileStore<HistoryState<EncounterSnapshot>>,
    pub history: EncounterHistory<EncounterSnapshot>,
    pub selection: EncounterSelectionService,
    reconcile: Option<JoinHandle<ReconcileOutcome>>,
    _log_guard: Option<WorkerGuard>,
}

impl MeterApp {
    /// Builds every store and service. Must run inside a tokio runtime.
    ///
    /// Order: paths, config, tracing, settings, history store, history
    /// cache with its reconcile task, selection.
    pub fn bootstrap(options: MeterOptions) -> anyhow::Result<Self> {
        tokio::runtime::Handle::try_current()
            .context("MeterApp::bootstrap must run inside a tokio runtime")?;

        let paths = MeterPaths::new(options.base_dir.as_deref());
        let config = ConfigService::new(paths.clone()).get_config();

        let log_guard = if options.init_tracing {
            let logs_dir = paths.logs_dir().context("Failed to resolve log directory")?;
            Some(init_tracing(&logs_dir, &config.log_level)?)
        } else {
            None
        };

        let store_options = StoreOptions::default();
        let settings = SettingsStores::open(&paths, store_options)
            .context("Failed to open settings stores")?;

        let history_store = JsonFileStore::open(
            &paths,
            ENCOUNTER_HISTORY_KEY,
            HistoryState::<EncounterSnapshot>::default(),
            store_options,
        )
        .context("Failed to open encounter history store")?;
        let history = EncounterHistory::new(
            Arc::new(history_store.clone()),
            Arc::new(settings.history.clone()),
        );
        let reconcile = history.spawn_reconcile(config.history);

        let selection_store = JsonFileStore::open(
            &paths,
            SELECTED_ENCOUNTER_KEY,
            EncounterSelection::default(),
            store_options,
        )
        .context("Failed to open encounter selection store")?;
        let selection = EncounterSelectionService::new(Arc::new(selection_store));

        tracing::info!(
            config_dir = ?paths.config_dir().ok(),
            max_encounters = settings.history.state().map(|h| h.max_encounters).unwrap_or_default(),
            "Meter client state ready"
        );

        Ok(Self {
            paths,
            config,
            settings,
            history_store,
            history,
            selection,
            reconcile: Some(reconcile),
            _log_guard: log_guard,
        })
    }

    /// Waits for the startup reconciliation; `None` once already awaited.
    pub async fn wait_reconciled(&mut self) -> Option<ReconcileOutcome> {
        let handle = self.reconcile.take()?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "History reconcile task failed");
                None
            }
        }
    }

    /// Applies the persisted shortcut bindings.
    pub async fn setup_shortcuts(
        &self,
        registry: &ShortcutRegistry,
    ) -> meter_core::error::Result<usize> {
        let bindings = self.settings.shortcuts.state()?;
        registry.setup(&bindings).await
    }
}
