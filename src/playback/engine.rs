//! Seam to the streaming media engine.
//!
//! The engine opens stream addresses and reports readiness, failure and
//! playhead position asynchronously. Every report is tagged with the
//! `AttemptId` of the open it belongs to so that the coordinator can
//! discard notifications from superseded attempts.

use std::fmt::{Display, Formatter, Result as FmtResult};

use {
    async_channel::Sender,
    tracing::debug,
    url::Url,
};

/// Generation token identifying a single stream open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(u64);

impl AttemptId {
    /// Creates a token from its raw generation number.
    #[must_use]
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    /// The token following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl Display for AttemptId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Notification posted by the engine for one open attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The stream is buffered and can start output.
    Ready {
        /// Attempt the notification belongs to.
        attempt: AttemptId,
    },
    /// The stream could not be opened or dropped while playing.
    Failed {
        /// Attempt the notification belongs to.
        attempt: AttemptId,
        /// Engine-provided description of the failure.
        reason: String,
    },
    /// Periodic playhead update, roughly once per second while playing.
    Position {
        /// Attempt the notification belongs to.
        attempt: AttemptId,
        /// Buffered live position in seconds.
        seconds: f64,
    },
}

impl EngineEvent {
    /// The attempt this notification was issued for.
    #[must_use]
    pub const fn attempt(&self) -> AttemptId {
        match self {
            Self::Ready { attempt }
            | Self::Failed { attempt, .. }
            | Self::Position { attempt, .. } => *attempt,
        }
    }
}

/// Notification sink handed to the engine with each open.
///
/// The sink is bound to a single attempt and may be cloned and used from any
/// thread. Notifications are queued for the coordinator's run loop; posting
/// never blocks.
#[derive(Debug, Clone)]
pub struct AttemptEvents {
    attempt: AttemptId,
    tx: Sender<EngineEvent>,
}

impl AttemptEvents {
    pub(crate) const fn new(attempt: AttemptId, tx: Sender<EngineEvent>) -> Self {
        Self { attempt, tx }
    }

    /// The attempt this sink reports for.
    #[must_use]
    pub const fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// Reports that the stream is ready for output.
    pub fn ready(&self) {
        self.post(EngineEvent::Ready {
            attempt: self.attempt,
        });
    }

    /// Reports that the stream failed.
    pub fn failed(&self, reason: impl Into<String>) {
        self.post(EngineEvent::Failed {
            attempt: self.attempt,
            reason: reason.into(),
        });
    }

    /// Reports the current playhead position in seconds.
    pub fn position(&self, seconds: f64) {
        self.post(EngineEvent::Position {
            attempt: self.attempt,
            seconds,
        });
    }

    fn post(&self, event: EngineEvent) {
        if let Err(e) = self.tx.try_send(event) {
            debug!("AttemptEvents: coordinator gone, dropping notification: {e}");
        }
    }
}

/// Streaming media engine driven by the coordinator.
///
/// The coordinator is the engine's only owner. Implementations must not block:
/// `open` starts an asynchronous load and reports its outcome through
/// `events`.
pub trait StreamEngine: Send {
    /// Starts loading `url`. Readiness, failure and position are reported
    /// through `events`.
    fn open(&mut self, url: &Url, events: AttemptEvents);

    /// Starts or resumes audio output of the open stream.
    fn play(&mut self);

    /// Pauses audio output, keeping the stream open.
    fn pause(&mut self);

    /// Tears down the open stream and stops all notifications for it.
    fn release(&mut self);

    /// Applies an output volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);
}

#[cfg(test)]
mod tests {
    use async_channel::unbounded;

    use crate::playback::engine::{AttemptEvents, AttemptId, EngineEvent};

    #[test]
    fn test_attempt_id_ordering() {
        let first = AttemptId::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next(), AttemptId::new(2));
        assert_eq!(first.to_string(), "1");
    }

    #[test]
    fn test_sink_tags_every_event() {
        let (tx, rx) = unbounded();
        let events = AttemptEvents::new(AttemptId::new(7), tx);

        events.ready();
        events.position(12.5);
        events.failed("reset by peer");

        let received: Vec<EngineEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(received.len(), 3);
        assert!(received.iter().all(|e| e.attempt() == AttemptId::new(7)));
        assert_eq!(
            received[2],
            EngineEvent::Failed {
                attempt: AttemptId::new(7),
                reason: "reset by peer".to_string(),
            }
        );
    }

    #[test]
    fn test_sink_after_receiver_dropped() {
        let (tx, rx) = unbounded();
        drop(rx);
        let events = AttemptEvents::new(AttemptId::new(1), tx);
        events.ready();
    }
}
