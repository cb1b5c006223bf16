//! Mutable state of the single playback session.

use {
    serde::{Deserialize, Serialize},
    url::Url,
};

use crate::{catalog::Station, playback::engine::AttemptId};

/// Phase of the playback state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackPhase {
    /// No stream is open.
    #[default]
    Idle,
    /// A stream was opened and readiness is awaited.
    Loading,
    /// Audio is being output.
    Playing,
    /// Output is paused; the station and stream are kept.
    Paused,
    /// The current attempt failed; resolved to `Loading` or `Idle` right away.
    Failed,
}

/// Which address of a station an attempt opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Primary,
    Fallback,
}

/// One open of a stream address.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamAttempt {
    /// Generation token of the open.
    pub id: AttemptId,
    /// Address handed to the engine.
    pub url: Url,
    /// Whether this is the station's primary or alternate address.
    pub source: StreamSource,
    /// Whether the engine reported the stream ready.
    pub ready: bool,
}

/// The coordinator's session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) station: Option<Station>,
    pub(crate) phase: PlaybackPhase,
    pub(crate) current_time: f64,
    pub(crate) volume: f32,
    pub(crate) attempt: Option<StreamAttempt>,
    pub(crate) paused_by_interruption: bool,
}

impl Session {
    /// Creates an idle session with the given output volume.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        Self {
            station: None,
            phase: PlaybackPhase::Idle,
            current_time: 0.0,
            volume: clamp_volume(volume).unwrap_or(1.0),
            attempt: None,
            paused_by_interruption: false,
        }
    }

    #[must_use]
    pub const fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    #[must_use]
    pub const fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Playing)
    }

    #[must_use]
    pub const fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub const fn attempt(&self) -> Option<&StreamAttempt> {
        self.attempt.as_ref()
    }

    /// Whether `attempt` is the open currently owned by the session.
    #[must_use]
    pub fn is_current(&self, attempt: AttemptId) -> bool {
        self.attempt.as_ref().is_some_and(|a| a.id == attempt)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Clamps a requested volume to `[0.0, 1.0]`.
///
/// Returns `None` for NaN, which has no meaningful nearest bound.
#[must_use]
pub fn clamp_volume(volume: f32) -> Option<f32> {
    if volume.is_nan() {
        None
    } else {
        Some(volume.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use crate::playback::session::{PlaybackPhase, Session, clamp_volume};

    #[test]
    fn test_clamp_volume_bounds() {
        assert_eq!(clamp_volume(1.4), Some(1.0));
        assert_eq!(clamp_volume(-0.2), Some(0.0));
        assert_eq!(clamp_volume(0.35), Some(0.35));
        assert_eq!(clamp_volume(f32::INFINITY), Some(1.0));
        assert_eq!(clamp_volume(f32::NAN), None);
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(2.0);
        assert_eq!(session.phase(), PlaybackPhase::Idle);
        assert!(session.station().is_none());
        assert!(session.attempt().is_none());
        assert!(!session.is_playing());
        assert_eq!(session.volume(), 1.0);
        assert_eq!(session.current_time(), 0.0);
    }

    #[test]
    fn test_nan_initial_volume_defaults_to_full() {
        assert_eq!(Session::new(f32::NAN).volume(), 1.0);
        assert_eq!(Session::default().volume(), 1.0);
    }
}
