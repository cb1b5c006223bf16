//! Seam to the operating system's now-playing and remote-command surface.

use serde::{Deserialize, Serialize};

use crate::catalog::Station;

/// Metadata shown by the system media controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NowPlayingInfo {
    /// Station display name.
    pub title: String,
    /// Localized station name, or the station's region label.
    pub subtitle: String,
    /// Artwork or symbol reference.
    pub artwork: String,
    /// Always set for radio streams; hides the scrubber.
    pub is_live_stream: bool,
    /// `1.0` while playing, `0.0` otherwise.
    pub playback_rate: f32,
}

impl NowPlayingInfo {
    /// Builds the now-playing metadata for a station.
    ///
    /// # Arguments
    ///
    /// * `station` - Station being played.
    /// * `playing` - Whether audio is currently being output.
    #[must_use]
    pub fn for_station(station: &Station, playing: bool) -> Self {
        Self {
            title: station.primary_name().to_string(),
            subtitle: station
                .secondary_name()
                .unwrap_or_else(|| station.category().label())
                .to_string(),
            artwork: station.icon().to_string(),
            is_live_stream: true,
            playback_rate: if playing { 1.0 } else { 0.0 },
        }
    }
}

/// System-level now-playing surface.
///
/// Only the coordinator writes to it.
pub trait NowPlayingSurface: Send {
    /// Replaces the displayed metadata.
    fn publish(&mut self, info: &NowPlayingInfo);

    /// Removes any displayed metadata.
    fn clear(&mut self);
}

/// Command received from hardware keys or system media controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
    TogglePlayPause,
}

/// Answer returned to the system for a remote command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommandStatus {
    /// The command was applied.
    Success,
    /// There is no station to act on.
    NoActionableItem,
    /// The coordinator is no longer running.
    CommandFailed,
}
