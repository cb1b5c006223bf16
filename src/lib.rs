//! Saudi Radio - Live Station Player Core
//!
//! The playback core of a live radio player for Saudi and international
//! stations. It holds the station catalog, persists user preferences, and
//! coordinates a single playback session over an external streaming engine,
//! retrying a fallback stream once when a station fails and keeping the
//! system now-playing surface in sync.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod playback;
pub mod state;

// Re-export key types for convenience
pub use {
    catalog::{Catalog, FallbackTable, Station, StationCategory, StationId},
    config::{PlaybackConfig, SettingsManager, UserSettings},
    error::{CatalogError, FailureReport, FailureResolution, PlaybackError},
    playback::{
        AttemptEvents, NowPlayingInfo, NowPlayingSurface, PlaybackCoordinator, PlaybackPhase,
        RemoteCommand, RemoteCommandStatus, StreamEngine,
    },
    state::{PlayerEvent, PlayerState},
};
