pub mod config_service;
pub mod paths;
pub mod settings_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::MeterPaths;
pub use crate::settings_service::SettingsStores;
pub use crate::storage::JsonFileStore;
