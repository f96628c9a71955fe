//! Player settings and persistent configuration.

pub mod settings;

pub use settings::{PlayerSettings, SettingsError, SettingsManager, get_config_path};
