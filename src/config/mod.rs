//! User preferences, settings, and playback configuration.
//!
//! This module provides user preference management with XDG Base Directory
//! compliance and the configuration the playback coordinator starts with.

pub mod playback;
pub mod settings;

pub use {
    playback::PlaybackConfig,
    settings::{
        MAX_RECENT_SEARCHES, SettingsError, SettingsManager, ThemePreference, UserSettings,
        get_config_path,
    },
};
