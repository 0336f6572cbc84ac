//! Encounter history domain.

pub mod model;

pub use model::{
    CURRENT_SELECTION, DEFAULT_MAX_ENCOUNTERS, ENCOUNTER_HISTORY_KEY, Encounter, HistoryState,
    SelectedEncounter, SelectedId, effective_limit,
};
