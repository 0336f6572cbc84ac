//! Encounter history domain models.
//!
//! The history is a bounded, newest-first list of encounter snapshots plus a
//! pointer to what the UI should show. Snapshot payloads are a type
//! parameter: nothing in this module looks inside them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Store key the history is persisted under.
pub const ENCOUNTER_HISTORY_KEY: &str = "encounterHistory";

/// Wire value of [`SelectedId::Current`].
pub const CURRENT_SELECTION: &str = "current";

/// Number of encounters kept when the user has not configured a limit.
pub const DEFAULT_MAX_ENCOUNTERS: usize = 10;

/// One captured combat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter<T> {
    /// Unique within a history; see `EncounterIdGenerator` in the application crate.
    pub id: String,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Opaque snapshot payload.
    pub data: T,
}

/// Which encounter the UI is looking at.
///
/// Serialized as a plain string: `"current"` for the live encounter, the
/// encounter id otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SelectedId {
    #[default]
    Current,
    Encounter(String),
}

impl SelectedId {
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Current => CURRENT_SELECTION,
            Self::Encounter(id) => id,
        }
    }
}

impl From<String> for SelectedId {
    fn from(value: String) -> Self {
        if value == CURRENT_SELECTION {
            Self::Current
        } else {
            Self::Encounter(value)
        }
    }
}

impl From<&str> for SelectedId {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SelectedId> for String {
    fn from(value: SelectedId) -> Self {
        match value {
            SelectedId::Current => CURRENT_SELECTION.to_string(),
            SelectedId::Encounter(id) => id,
        }
    }
}

impl fmt::Display for SelectedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved answer to "what should the UI show".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SelectedEncounter<T> {
    /// The live encounter tracked by the backend.
    Current,
    /// A stored encounter.
    History { id: String, timestamp: i64, data: T },
}

impl<T> SelectedEncounter<T> {
    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    /// Historical payload, `None` in current mode.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Current => None,
            Self::History { data, .. } => Some(data),
        }
    }
}

/// Persisted and reactive history value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState<T> {
    /// Newest first.
    #[serde(default)]
    pub encounters: Vec<Encounter<T>>,
    #[serde(default)]
    pub selected_id: SelectedId,
}

impl<T> Default for HistoryState<T> {
    fn default() -> Self {
        Self {
            encounters: Vec::new(),
            selected_id: SelectedId::Current,
        }
    }
}

impl<T> HistoryState<T> {
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    /// Prepends `encounter` and drops the oldest entries beyond `max`.
    ///
    /// A limit of zero means "unset" and falls back to
    /// [`DEFAULT_MAX_ENCOUNTERS`].
    pub fn push(&mut self, encounter: Encounter<T>, max: usize) {
        self.encounters.insert(0, encounter);
        self.encounters.truncate(effective_limit(max));
    }

    /// Combines changes made before the store loaded with the `persisted`
    /// value.
    ///
    /// Local encounters go in front of the persisted ones, repeated ids keep
    /// their first entry and the result is bounded by `max`. A local
    /// selection other than `current` wins over the persisted one.
    pub fn merge_onto(self, persisted: HistoryState<T>, max: usize) -> HistoryState<T> {
        let selected_id = if self.selected_id.is_current() {
            persisted.selected_id
        } else {
            self.selected_id
        };
        let mut merged = HistoryState {
            encounters: self
                .encounters
                .into_iter()
                .chain(persisted.encounters)
                .collect(),
            selected_id,
        };
        merged.dedup_ids();
        merged.encounters.truncate(effective_limit(max));
        merged
    }

    pub fn select(&mut self, id: SelectedId) {
        self.selected_id = id;
    }

    /// Empties the list; the selection is left as is and may dangle.
    pub fn clear(&mut self) {
        self.encounters.clear();
    }

    pub fn find(&self, id: &str) -> Option<&Encounter<T>> {
        self.encounters.iter().find(|e| e.id == id)
    }

    /// Drops every entry whose id already appeared earlier in the list.
    ///
    /// Returns the number of entries removed.
    pub fn dedup_ids(&mut self) -> usize {
        let before = self.encounters.len();
        let mut seen = HashSet::with_capacity(before);
        self.encounters.retain(|e| seen.insert(e.id.clone()));
        before - self.encounters.len()
    }
}

/// History limit with zero mapped to [`DEFAULT_MAX_ENCOUNTERS`].
pub fn effective_limit(max: usize) -> usize {
    if max == 0 { DEFAULT_MAX_ENCOUNTERS } else { max }
}

impl<T: Clone> HistoryState<T> {
    /// Dangling selections resolve to [`SelectedEncounter::Current`].
    pub fn selected_encounter(&self) -> SelectedEncounter<T> {
        match &self.selected_id {
            SelectedId::Current => SelectedEncounter::Current,
            SelectedId::Encounter(id) => match self.find(id) {
                Some(found) => SelectedEncounter::History {
                    id: found.id.clone(),
                    timestamp: found.timestamp,
                    data: found.data.clone(),
                },
                None => SelectedEncounter::Current,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encounter(id: &str, timestamp: i64) -> Encounter<u32> {
        Encounter {
            id: id.to_string(),
            timestamp,
            data: timestamp as u32,
        }
    }

    #[test]
    fn test_default_state() {
        let state = HistoryState::<u32>::default();
        assert!(state.is_empty());
        assert_eq!(state.selected_id, SelectedId::Current);
        assert!(state.selected_encounter().is_current());
    }

    #[test]
    fn test_push_prepends_and_truncates() {
        let mut state = HistoryState::default();
        state.push(encounter("a", 1), 2);
        state.push(encounter("b", 2), 2);
        state.push(encounter("c", 3), 2);

        let ids: Vec<&str> = state.encounters.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn test_push_with_zero_limit_uses_default() {
        let mut state = HistoryState::default();
        for n in 0..12 {
            state.push(encounter(&format!("e{}", n), n), 0);
        }
        assert_eq!(state.encounters.len(), DEFAULT_MAX_ENCOUNTERS);
        assert_eq!(state.encounters[0].id, "e11");
    }

    #[test]
    fn test_merge_puts_local_first_and_bounds() {
        let mut persisted = HistoryState::default();
        persisted.push(encounter("old-1", 1), 10);
        persisted.push(encounter("old-2", 2), 10);
        persisted.select("old-1".into());

        let mut local = HistoryState::default();
        local.push(encounter("old-2", 2), 10);
        local.push(encounter("new", 3), 10);

        let merged = local.merge_onto(persisted, 2);

        let ids: Vec<&str> = merged.encounters.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old-2"]);
        assert_eq!(merged.selected_id, SelectedId::Encounter("old-1".to_string()));
    }

    #[test]
    fn test_merge_prefers_local_selection() {
        let mut persisted = HistoryState::default();
        persisted.push(encounter("old", 1), 10);
        persisted.select("old".into());

        let mut local = HistoryState::<u32>::default();
        local.select("new".into());

        let merged = local.merge_onto(persisted, 10);
        assert_eq!(merged.selected_id, SelectedId::Encounter("new".to_string()));
        assert_eq!(merged.encounters.len(), 1);
    }

    #[test]
    fn test_selected_encounter_resolves_history() {
        let mut state = HistoryState::default();
        state.push(encounter("a", 42), 10);
        state.select("a".into());

        assert_eq!(
            state.selected_encounter(),
            SelectedEncounter::History {
                id: "a".to_string(),
                timestamp: 42,
                data: 42,
            }
        );
    }

    #[test]
    fn test_dangling_selection_falls_back_to_current() {
        let mut state = HistoryState::default();
        state.push(encounter("a", 1), 10);
        state.select("a".into());
        state.clear();

        assert_eq!(state.selected_id, SelectedId::Encounter("a".to_string()));
        assert!(state.selected_encounter().is_current());
    }

    #[test]
    fn test_dedup_ids_keeps_first_occurrence() {
        let mut state = HistoryState {
            encounters: vec![encounter("a", 3), encounter("b", 2), encounter("a", 1)],
            selected_id: SelectedId::Current,
        };
        assert_eq!(state.dedup_ids(), 1);
        assert_eq!(state.encounters.len(), 2);
        assert_eq!(state.encounters[0].timestamp, 3);
    }

    #[test]
    fn test_wire_format() {
        let mut state = HistoryState::default();
        state.push(encounter("1700000000000-abc", 5), 10);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({
                "encounters": [{ "id": "1700000000000-abc", "timestamp": 5, "data": 5 }],
                "selectedId": "current"
            })
        );

        let parsed: HistoryState<u32> =
            serde_json::from_value(json!({ "selectedId": "1700000000000-abc" })).unwrap();
        assert!(parsed.encounters.is_empty());
        assert_eq!(
            parsed.selected_id,
            SelectedId::Encounter("1700000000000-abc".to_string())
        );
    }

    #[test]
    fn test_selected_encounter_serializes_mode_tag() {
        let current = serde_json::to_value(SelectedEncounter::<u32>::Current).unwrap();
        assert_eq!(current, json!({ "mode": "current" }));

        let history = serde_json::to_value(SelectedEncounter::History {
            id: "x".to_string(),
            timestamp: 7,
            data: 1u32,
        })
        .unwrap();
        assert_eq!(history["mode"], "history");
        assert_eq!(history["id"], "x");
    }
}
