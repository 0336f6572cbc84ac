//! Startup reconciliation between the history cache and its store.
//!
//! The store may finish loading after the cache is built. Stores with a load
//! signal are awaited once, bounded by the reconciliation window; stores
//! without one are polled at a fixed interval. Either way the first
//! non-empty value is adopted and the task ends; if none shows up the cache
//! keeps its current value.

use meter_core::config::ReconcileSettings;

use super::cache::EncounterHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The store's value was adopted after `attempts` reads past the
    /// startup read (0 when the startup read already adopted it).
    Adopted { attempts: u32 },
    /// The store reported no history within the window.
    GaveUp,
}

pub(crate) async fn reconcile<T>(
    history: EncounterHistory<T>,
    settings: ReconcileSettings,
) -> ReconcileOutcome
where
    T: Clone + Send + Sync + 'static,
{
    if history.is_adopted() {
        return ReconcileOutcome::Adopted { attempts: 0 };
    }

    if let Some(mut loaded) = history.store_loaded_signal() {
        let finished = matches!(
            tokio::time::timeout(settings.window(), loaded.wait_for(|done| *done)).await,
            Ok(Ok(_))
        );
        if !finished {
            tracing::debug!(
                window_ms = settings.window().as_millis() as u64,
                "History store did not finish loading in time"
            );
        }
        return if history.try_adopt() {
            ReconcileOutcome::Adopted { attempts: 1 }
        } else {
            tracing::debug!("History store holds no encounters; keeping in-memory history");
            ReconcileOutcome::GaveUp
        };
    }

    for attempt in 1..=settings.max_poll_attempts {
        tokio::time::sleep(settings.poll_interval()).await;
        if history.try_adopt() {
            return ReconcileOutcome::Adopted { attempts: attempt };
        }
    }

    tracing::debug!(
        attempts = settings.max_poll_attempts,
        "History store stayed empty; giving up"
    );
    ReconcileOutcome::GaveUp
}
