//! File-backed settings stores.
//!
//! Every settings group gets its own store and file so an update to one group
//! never rewrites another.

use meter_core::error::Result;
use meter_core::settings::{
    AccessibilitySettings, GeneralSettings, HistorySettings, IntegrationSettings, MiscSettings,
    SettingsKey, ShortcutSettings, StatColumns,
};
use meter_core::store::StoreOptions;
use serde::{Serialize, de::DeserializeOwned};

use crate::paths::MeterPaths;
use crate::storage::JsonFileStore;

/// Column settings of the players table and the skill breakdown of one meter.
#[derive(Clone)]
pub struct TableSettings {
    pub players: JsonFileStore<StatColumns>,
    pub skill_breakdown: JsonFileStore<StatColumns>,
}

#[derive(Clone)]
pub struct LiveSettings {
    pub dps: TableSettings,
    pub heal: TableSettings,
}

/// All user settings stores.
#[derive(Clone)]
pub struct SettingsStores {
    pub general: JsonFileStore<GeneralSettings>,
    pub accessibility: JsonFileStore<AccessibilitySettings>,
    pub shortcuts: JsonFileStore<ShortcutSettings>,
    pub live: LiveSettings,
    pub misc: JsonFileStore<MiscSettings>,
    pub integration: JsonFileStore<IntegrationSettings>,
    pub history: JsonFileStore<HistorySettings>,
}

impl SettingsStores {
    /// Opens every settings store with its default value.
    ///
    /// With `options.auto_start` each store starts loading in the background
    /// right away.
    pub fn open(paths: &MeterPaths, options: StoreOptions) -> Result<Self> {
        Ok(Self {
            general: open_store(paths, SettingsKey::General, options)?,
            accessibility: open_store(paths, SettingsKey::Accessibility, options)?,
            shortcuts: open_store(paths, SettingsKey::Shortcuts, options)?,
            live: LiveSettings {
                dps: TableSettings {
                    players: open_store(paths, SettingsKey::LiveDpsPlayers, options)?,
                    skill_breakdown: open_store(paths, SettingsKey::LiveDpsSkillBreakdown, options)?,
                },
                heal: TableSettings {
                    players: open_store(paths, SettingsKey::LiveHealPlayers, options)?,
                    skill_breakdown: open_store(
                        paths,
                        SettingsKey::LiveHealSkillBreakdown,
                        options,
                    )?,
                },
            },
            misc: open_store(paths, SettingsKey::Misc, options)?,
            integration: open_store(paths, SettingsKey::Integration, options)?,
            history: open_store(paths, SettingsKey::History, options)?,
        })
    }

    /// Loads every store; for callers that opened without `auto_start`.
    pub async fn start_all(&self) {
        self.general.start().await;
        self.accessibility.start().await;
        self.shortcuts.start().await;
        self.live.dps.players.start().await;
        self.live.dps.skill_breakdown.start().await;
        self.live.heal.players.start().await;
        self.live.heal.skill_breakdown.start().await;
        self.misc.start().await;
        self.integration.start().await;
        self.history.start().await;
    }
}

fn open_store<T>(
    paths: &MeterPaths,
    key: SettingsKey,
    options: StoreOptions,
) -> Result<JsonFileStore<T>>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    JsonFileStore::open(paths, key.as_str(), T::default(), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::settings::Theme;
    use meter_core::store::StateStore;
    use std::fs;
    use tempfile::TempDir;

    const MANUAL: StoreOptions = StoreOptions {
        auto_start: false,
        save_on_change: true,
    };

    #[tokio::test]
    async fn test_stores_use_their_keys() {
        let temp_dir = TempDir::new().unwrap();
        let settings = SettingsStores::open(&MeterPaths::new(Some(temp_dir.path())), MANUAL).unwrap();

        assert_eq!(settings.live.heal.skill_breakdown.key(), "liveHealSkillBreakdown");
        assert!(
            settings
                .live
                .dps
                .players
                .path()
                .ends_with("stores/liveDpsPlayers.json")
        );
        assert_eq!(settings.history.state().unwrap().max_encounters, 10);
    }

    #[tokio::test]
    async fn test_start_all_loads_persisted_groups() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MeterPaths::new(Some(temp_dir.path()));
        fs::create_dir_all(paths.stores_dir().unwrap()).unwrap();
        fs::write(
            paths.store_file("accessibility").unwrap(),
            r#"{ "transparencyOpacity": 80, "theme": "light" }"#,
        )
        .unwrap();
        fs::write(paths.store_file("history").unwrap(), r#"{ "maxEncounters": 3 }"#).unwrap();

        let settings = SettingsStores::open(&paths, MANUAL).unwrap();
        settings.start_all().await;

        let accessibility = settings.accessibility.state().unwrap();
        assert_eq!(accessibility.theme, Theme::Light);
        assert_eq!(accessibility.transparency_opacity, 80);
        assert_eq!(settings.history.state().unwrap().max_encounters, 3);
        assert!(settings.general.state().unwrap().autostart);
    }
}
