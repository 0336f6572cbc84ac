//! Application layer for the meter client.
//!
//! Services built on the core traits plus the composition root that wires
//! them to file-backed stores.

pub mod bootstrap;
pub mod clickthrough;
pub mod history;
pub mod logging;
pub mod player_metadata;
pub mod selection;
pub mod shortcut_registry;

pub use bootstrap::{EncounterSnapshot, MeterApp, MeterOptions};
pub use clickthrough::ClickthroughController;
pub use history::{EncounterHistory, ReconcileOutcome};
pub use player_metadata::PlayerMetadataService;
pub use selection::EncounterSelectionService;
pub use shortcut_registry::ShortcutRegistry;
