//! Player settings with XDG Base Directory compliant persistence.
//!
//! Queue contents and playback position are deliberately not persisted here;
//! that belongs to the embedding application. This module only covers the
//! player's own tunables.

use std::{
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::PathBuf,
};

use {
    parking_lot::{RwLock, RwLockReadGuard},
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

use crate::player::types::RepeatMode;

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write the settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
}

/// Serializable player settings with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Progress clock period in milliseconds while playing.
    pub tick_interval_ms: u64,
    /// Repeat mode the player starts with.
    pub repeat_mode: RepeatMode,
    /// Buffer capacity of the combined event feed, per lagging subscriber.
    pub event_channel_capacity: usize,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            repeat_mode: RepeatMode::QueueRepeat,
            event_channel_capacity: 16,
        }
    }
}

/// Handles loading and saving of player settings.
#[derive(Debug)]
pub struct SettingsManager {
    /// Thread-safe settings storage.
    settings: RwLock<PlayerSettings>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl SettingsManager {
    /// Creates a settings manager backed by the default config path.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if an existing settings file cannot be read
    /// or parsed.
    pub fn new() -> Result<Self, SettingsError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a settings manager backed by a custom path (for testing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if an existing settings file cannot be read
    /// or parsed.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, SettingsError> {
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }

        let settings = if config_path.exists() {
            debug!("Loading settings from existing file: {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            from_str(&contents)?
        } else {
            debug!("Using default settings; no file at {:?}", config_path);
            PlayerSettings::default()
        };

        Ok(SettingsManager {
            settings: RwLock::new(settings),
            config_path,
        })
    }

    /// Gets the current settings.
    pub fn get_settings(&self) -> RwLockReadGuard<'_, PlayerSettings> {
        self.settings.read()
    }

    /// Gets the configuration file path.
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Replaces the settings and saves them to disk.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings cannot be written.
    pub fn update_settings(&self, new_settings: PlayerSettings) -> Result<(), SettingsError> {
        let mut settings_write = self.settings.write();
        *settings_write = new_settings;
        drop(settings_write);
        self.save_settings()
    }

    fn save_settings(&self) -> Result<(), SettingsError> {
        debug!("Saving settings to file: {:?}", self.config_path);
        let contents = to_string_pretty(&*self.settings.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Ensures proper XDG directory usage for the config file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("cadenza");
    config_dir.push("settings.json");
    config_dir
}

/// Uses `XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`.
fn get_xdg_config_home() -> PathBuf {
    if let Ok(config_home) = var("XDG_CONFIG_HOME")
        && !config_home.is_empty()
    {
        return PathBuf::from(config_home);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(".config");
        return path;
    }

    // Fallback to current directory if HOME is not set (shouldn't happen on Unix)
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use serde_json::{from_str, to_string};
    use tempfile::tempdir;

    use crate::{
        config::settings::{PlayerSettings, SettingsManager},
        player::types::RepeatMode,
    };

    #[test]
    fn test_player_settings_default() {
        let settings = PlayerSettings::default();
        assert_eq!(settings.tick_interval_ms, 500);
        assert_eq!(settings.repeat_mode, RepeatMode::QueueRepeat);
        assert_eq!(settings.event_channel_capacity, 16);
    }

    #[test]
    fn test_player_settings_serialization() {
        let settings = PlayerSettings {
            tick_interval_ms: 250,
            repeat_mode: RepeatMode::Shuffle,
            event_channel_capacity: 32,
        };
        let serialized = to_string(&settings).unwrap();
        let deserialized: PlayerSettings = from_str(&serialized).unwrap();
        assert_eq!(settings, deserialized);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::with_config_path(dir.path().join("settings.json")).unwrap();
        assert_eq!(*manager.get_settings(), PlayerSettings::default());
    }

    #[test]
    fn test_update_then_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let manager = SettingsManager::with_config_path(path.clone()).unwrap();
        let mut settings = manager.get_settings().clone();
        settings.tick_interval_ms = 100;
        settings.repeat_mode = RepeatMode::Loop;
        manager.update_settings(settings.clone()).unwrap();

        let reloaded = SettingsManager::with_config_path(path).unwrap();
        assert_eq!(*reloaded.get_settings(), settings);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SettingsManager::with_config_path(path).is_err());
    }
}
