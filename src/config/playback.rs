//! Playback coordinator configuration.

use crate::{catalog::FallbackTable, config::settings::UserSettings, playback::session::clamp_volume};

/// Settings the playback coordinator starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Initial output volume in `[0.0, 1.0]`.
    pub initial_volume: f32,
    /// Alternate stream per station, tried once after the primary fails.
    pub fallbacks: FallbackTable,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            fallbacks: FallbackTable::builtin(),
        }
    }
}

impl PlaybackConfig {
    /// Builds the configuration from persisted user settings.
    ///
    /// User fallback overrides replace built-in entries for the same station.
    ///
    /// # Arguments
    ///
    /// * `settings` - Loaded user settings.
    ///
    /// # Returns
    ///
    /// A `PlaybackConfig` with a valid volume.
    #[must_use]
    pub fn from_settings(settings: &UserSettings) -> Self {
        Self {
            initial_volume: clamp_volume(settings.volume).unwrap_or(1.0),
            fallbacks: FallbackTable::builtin().merged_with(&settings.fallback_streams),
        }
    }
}
