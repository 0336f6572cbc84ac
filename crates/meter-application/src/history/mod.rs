//! Encounter history cache.

mod cache;
mod id;
mod reconcile;

pub use cache::{EncounterHistory, HistoryLimits, HistoryStore};
pub use id::EncounterIdGenerator;
pub use reconcile::ReconcileOutcome;
