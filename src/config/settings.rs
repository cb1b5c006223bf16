//! User preference management with XDG Base Directory compliance.
//!
//! This module provides persisted user settings (volume, theme, favorites,
//! recent searches, last station and stream overrides) stored as JSON in
//! the XDG config directory.

use std::{
    collections::BTreeMap,
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
    tracing::{debug, warn},
    url::Url,
};

use crate::catalog::{Catalog, Station, StationId};

/// Maximum number of remembered search terms.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid settings value.
    #[error("Invalid settings value: {reason}")]
    InvalidValue { reason: String },
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Follow the system appearance.
    #[default]
    System,
    Light,
    Dark,
}

/// Serializable user settings structure with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Output volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// Theme preference (system/light/dark).
    pub theme_preference: ThemePreference,
    /// Favorite stations, in the order they were added.
    pub favorite_stations: Vec<StationId>,
    /// Recent search terms, most recent first.
    pub recent_searches: Vec<String>,
    /// Station to cue at launch.
    pub last_station: Option<StationId>,
    /// Alternate stream addresses overriding or extending the built-in table.
    pub fallback_streams: BTreeMap<StationId, Url>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            theme_preference: ThemePreference::System,
            favorite_stations: vec![],
            recent_searches: vec![],
            last_station: None,
            fallback_streams: BTreeMap::new(),
        }
    }
}

/// Handles loading, saving, and validation of user preferences.
#[derive(Debug)]
pub struct SettingsManager {
    /// Thread-safe user settings storage.
    settings: RwLock<UserSettings>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl SettingsManager {
    /// Creates a new settings manager with default config path.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SettingsManager` or a `SettingsError`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk.
    pub fn new() -> Result<Self, SettingsError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a new settings manager with a custom config path (for testing).
    ///
    /// # Arguments
    ///
    /// * `config_path` - Custom path for the settings file
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SettingsManager` or a `SettingsError`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, SettingsError> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }

        let settings = if config_path.exists() {
            debug!("Loading settings from existing file: {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            from_str(&contents)?
        } else {
            debug!("Creating new default settings file: {:?}", config_path);
            UserSettings::default()
        };

        Ok(SettingsManager {
            settings: RwLock::new(settings),
            config_path,
        })
    }

    /// Gets the current settings.
    ///
    /// # Returns
    ///
    /// A reference to the current `UserSettings`.
    pub fn get_settings(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.settings.read()
    }

    /// Gets the configuration file path.
    ///
    /// # Returns
    ///
    /// A reference to the configuration file path.
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Updates the settings and saves them to disk.
    ///
    /// # Arguments
    ///
    /// * `new_settings` - New settings to apply.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn update_settings(&self, new_settings: UserSettings) -> Result<(), SettingsError> {
        let mut settings_write = self.settings.write();
        *settings_write = new_settings;
        drop(settings_write);
        self.save_settings()
    }

    /// Adds or removes a favorite station.
    ///
    /// # Returns
    ///
    /// `true` if the station is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn toggle_favorite(&self, station: StationId) -> Result<bool, SettingsError> {
        let is_favorite = {
            let mut settings = self.settings.write();
            if let Some(index) = settings
                .favorite_stations
                .iter()
                .position(|id| *id == station)
            {
                settings.favorite_stations.remove(index);
                false
            } else {
                settings.favorite_stations.push(station);
                true
            }
        };

        self.save_settings()?;
        Ok(is_favorite)
    }

    /// Whether a station is marked as favorite.
    #[must_use]
    pub fn is_favorite(&self, station: StationId) -> bool {
        self.settings.read().favorite_stations.contains(&station)
    }

    /// Remembers a search term, most recent first.
    ///
    /// Blank terms are ignored; a repeated term moves to the front.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn record_search(&self, term: &str) -> Result<(), SettingsError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(());
        }

        {
            let mut settings = self.settings.write();
            settings.recent_searches.retain(|existing| existing != term);
            settings.recent_searches.insert(0, term.to_string());
            settings.recent_searches.truncate(MAX_RECENT_SEARCHES);
        }

        self.save_settings()
    }

    /// Forgets all recent search terms.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn clear_recent_searches(&self) -> Result<(), SettingsError> {
        self.settings.write().recent_searches.clear();
        self.save_settings()
    }

    /// Records the station to cue at next launch.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    pub fn set_last_station(&self, station: Option<StationId>) -> Result<(), SettingsError> {
        self.settings.write().last_station = station;
        self.save_settings()
    }

    /// Stores the output volume.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` for values outside `[0.0, 1.0]`,
    /// or if settings cannot be saved to disk.
    pub fn set_volume(&self, volume: f32) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(SettingsError::InvalidValue {
                reason: format!("volume {volume} is outside 0.0..=1.0"),
            });
        }

        self.settings.write().volume = volume;
        self.save_settings()
    }

    /// Resolves the remembered last station against `catalog`.
    ///
    /// Returns `None` if nothing was remembered or the station is no longer
    /// in the catalog.
    #[must_use]
    pub fn restore_last_station(&self, catalog: &Catalog) -> Option<Station> {
        let id = self.settings.read().last_station?;
        match catalog.require(id) {
            Ok(station) => Some(station.clone()),
            Err(e) => {
                warn!("Settings: cannot restore last station: {e}");
                None
            }
        }
    }

    /// Saves the current settings to disk.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be saved to disk.
    fn save_settings(&self) -> Result<(), SettingsError> {
        debug!("Saving settings to file: {:?}", self.config_path);
        let contents = to_string_pretty(&*self.settings.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Ensures proper XDG directory usage for the config file.
///
/// # Returns
///
/// The path to the configuration file.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = get_xdg_config_home();
    config_dir.push("saudiradio");
    config_dir.push("settings.json");
    config_dir
}

/// Gets the XDG config home directory.
///
/// Uses `XDG_CONFIG_HOME` environment variable if set, otherwise defaults to $HOME/.config
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

    PathBuf::from(".")
}
