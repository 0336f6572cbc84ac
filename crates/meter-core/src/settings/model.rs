//! User settings models.
//!
//! Each group is persisted under its own key as a flat object so that adding
//! an option never requires touching the other groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_MAX_ENCOUNTERS;
use crate::shortcut::ShortcutCommand;

/// Store keys for every settings group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKey {
    General,
    Accessibility,
    Shortcuts,
    LiveDpsPlayers,
    LiveDpsSkillBreakdown,
    LiveHealPlayers,
    LiveHealSkillBreakdown,
    Misc,
    Integration,
    History,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 10] = [
        Self::General,
        Self::Accessibility,
        Self::Shortcuts,
        Self::LiveDpsPlayers,
        Self::LiveDpsSkillBreakdown,
        Self::LiveHealPlayers,
        Self::LiveHealSkillBreakdown,
        Self::Misc,
        Self::Integration,
        Self::History,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Accessibility => "accessibility",
            Self::Shortcuts => "shortcuts",
            Self::LiveDpsPlayers => "liveDpsPlayers",
            Self::LiveDpsSkillBreakdown => "liveDpsSkillBreakdown",
            Self::LiveHealPlayers => "liveHealPlayers",
            Self::LiveHealSkillBreakdown => "liveHealSkillBreakdown",
            Self::Misc => "misc",
            Self::Integration => "integration",
            Self::History => "history",
        }
    }
}

/// How the local player's name is shown in the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OwnNameDisplay {
    #[default]
    #[serde(rename = "Show Your Name")]
    ShowName,
    #[serde(rename = "Show Your Class")]
    ShowClass,
    #[serde(rename = "Hide Your Name")]
    Hide,
}

/// How other players' names are shown in the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OthersNameDisplay {
    #[default]
    #[serde(rename = "Show Others' Name")]
    ShowName,
    #[serde(rename = "Show Others' Class")]
    ShowClass,
    #[serde(rename = "Hide Others' Name")]
    Hide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub show_your_name: OwnNameDisplay,
    pub show_others_name: OthersNameDisplay,
    pub show_your_ability_score: bool,
    pub show_others_ability_score: bool,
    /// Seconds without combat before the live encounter resets.
    pub reset_elapsed: u32,
    pub shorten_ability_score: bool,
    pub boss_only: bool,
    pub autostart: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            show_your_name: OwnNameDisplay::default(),
            show_others_name: OthersNameDisplay::default(),
            show_your_ability_score: true,
            show_others_ability_score: true,
            reset_elapsed: 60,
            shorten_ability_score: false,
            boss_only: false,
            autostart: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilitySettings {
    /// Background opacity of the live window, 0-100.
    pub transparency_opacity: u8,
    pub theme: Theme,
}

impl Default for AccessibilitySettings {
    fn default() -> Self {
        Self {
            transparency_opacity: 60,
            theme: Theme::Dark,
        }
    }
}

/// Accelerator strings per shortcut command. Empty means unbound.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortcutSettings {
    pub toggle_live_meter: String,
    pub toggle_clickthrough: String,
    pub reset_encounter: String,
    pub show_dps_tab: String,
    pub show_heal_tab: String,
    pub hard_reset: String,
    /// Bindings for command ids this build does not know.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, String>,
}

impl ShortcutSettings {
    /// Every binding as `(command id, accelerator)`, known commands first.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let known = ShortcutCommand::ALL
            .iter()
            .map(|command| (command.as_str(), self.binding(*command)));
        let unknown = self
            .unknown
            .iter()
            .map(|(id, key)| (id.as_str(), key.as_str()));
        known.chain(unknown).collect()
    }

    pub fn binding(&self, command: ShortcutCommand) -> &str {
        match command {
            ShortcutCommand::ToggleLiveMeter => &self.toggle_live_meter,
            ShortcutCommand::ShowDpsTab => &self.show_dps_tab,
            ShortcutCommand::ShowHealTab => &self.show_heal_tab,
            ShortcutCommand::ToggleClickthrough => &self.toggle_clickthrough,
            ShortcutCommand::ResetEncounter => &self.reset_encounter,
            ShortcutCommand::HardReset => &self.hard_reset,
        }
    }
}

/// Column toggles for one live table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatColumns {
    pub total_value: bool,
    pub value_per_sec: bool,
    pub value_pct: bool,
    pub crit_rate: bool,
    pub crit_value_rate: bool,
    pub lucky_rate: bool,
    pub lucky_value_rate: bool,
    pub hits: bool,
    pub hits_per_minute: bool,
}

impl Default for StatColumns {
    fn default() -> Self {
        Self {
            total_value: true,
            value_per_sec: true,
            value_pct: true,
            crit_rate: true,
            crit_value_rate: true,
            lucky_rate: false,
            lucky_value_rate: false,
            hits: false,
            hits_per_minute: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiscSettings {
    pub testing_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationSettings {
    pub bptimer: bool,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self { bptimer: true }
    }
}

/// Limits applied to the encounter history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistorySettings {
    pub max_encounters: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_encounters: DEFAULT_MAX_ENCOUNTERS,
        }
    }
}
