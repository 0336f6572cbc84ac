//! User settings domain.

pub mod model;

pub use model::{
    AccessibilitySettings, GeneralSettings, HistorySettings, IntegrationSettings, MiscSettings,
    OthersNameDisplay, OwnNameDisplay, SettingsKey, ShortcutSettings, StatColumns, Theme,
};
