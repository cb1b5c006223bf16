//! Published playback state with reactive update mechanisms.
//!
//! This module provides the `PlayerState` container that mirrors the
//! coordinator's session for the view layer, with thread-safe snapshot
//! access and broadcast change notifications.

use {
    parking_lot::RwLock,
    tokio::{
        spawn,
        sync::broadcast::{Receiver, Sender, channel, error::RecvError},
        task::JoinHandle,
    },
    tracing::{debug, warn},
};

use crate::{
    catalog::Station,
    error::FailureReport,
    playback::PlaybackPhase::{self, Idle, Playing},
};

const EVENT_CAPACITY: usize = 64;

/// Observable mirror of the playback session.
///
/// Only the coordinator updates it; any number of readers can take
/// snapshots or subscribe to change events.
#[derive(Debug)]
pub struct PlayerState {
    /// Station currently loaded, if any.
    station: RwLock<Option<Station>>,
    /// Current phase of the state machine.
    phase: RwLock<PlaybackPhase>,
    /// Live playhead position in seconds.
    current_time: RwLock<f64>,
    /// Output volume in `[0.0, 1.0]`.
    volume: RwLock<f32>,
    /// Most recent stream failure.
    last_failure: RwLock<Option<FailureReport>>,
    /// Broadcast channel for state change notifications.
    state_tx: Sender<PlayerEvent>,
}

/// Playback state change events.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Current station changed.
    StationChanged(Option<Station>),
    /// Phase changed.
    PhaseChanged(PlaybackPhase),
    /// Playhead advanced.
    PositionChanged(f64),
    /// Output volume changed.
    VolumeChanged(f32),
    /// A stream failed.
    StreamFailed(FailureReport),
}

impl PlayerState {
    /// Creates an idle state with the given volume.
    ///
    /// # Arguments
    ///
    /// * `volume` - Initial output volume, already clamped.
    ///
    /// # Returns
    ///
    /// A new `PlayerState` instance.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        let (state_tx, _) = channel(EVENT_CAPACITY);

        Self {
            station: RwLock::new(None),
            phase: RwLock::new(Idle),
            current_time: RwLock::new(0.0),
            volume: RwLock::new(volume),
            last_failure: RwLock::new(None),
            state_tx,
        }
    }

    pub(crate) fn update_station(&self, station: Option<Station>) {
        {
            let mut current = self.station.write();
            if *current == station {
                return;
            }
            *current = station.clone();
        }
        self.send(PlayerEvent::StationChanged(station));
    }

    pub(crate) fn update_phase(&self, phase: PlaybackPhase) {
        {
            let mut current = self.phase.write();
            if *current == phase {
                return;
            }
            *current = phase;
        }
        self.send(PlayerEvent::PhaseChanged(phase));
    }

    pub(crate) fn update_current_time(&self, seconds: f64) {
        {
            let mut current = self.current_time.write();
            if *current == seconds {
                return;
            }
            *current = seconds;
        }
        self.send(PlayerEvent::PositionChanged(seconds));
    }

    pub(crate) fn update_volume(&self, volume: f32) {
        {
            let mut current = self.volume.write();
            if *current == volume {
                return;
            }
            *current = volume;
        }
        self.send(PlayerEvent::VolumeChanged(volume));
    }

    pub(crate) fn record_failure(&self, report: FailureReport) {
        *self.last_failure.write() = Some(report.clone());
        self.send(PlayerEvent::StreamFailed(report));
    }

    fn send(&self, event: PlayerEvent) {
        // No receivers is fine; views subscribe lazily.
        let _ = self.state_tx.send(event);
    }

    /// Subscribes to playback state changes.
    ///
    /// # Returns
    ///
    /// A broadcast receiver for state change events.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.state_tx.subscribe()
    }

    /// Drives `observer` with every future event on a spawned task.
    ///
    /// Must be called from within a tokio runtime. The task ends once the
    /// coordinator owning this state is gone.
    pub fn observe<O: StateObserver>(&self, mut observer: O) -> JoinHandle<()> {
        let mut receiver = self.subscribe();

        spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => observer.handle_state_change(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("PlayerState: observer lagged, skipped {skipped} events");
                    }
                    Err(RecvError::Closed) => {
                        debug!("PlayerState: event channel closed, stopping observer");
                        break;
                    }
                }
            }
        })
    }

    #[must_use]
    pub fn current_station(&self) -> Option<Station> {
        self.station.read().clone()
    }

    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        *self.phase.read()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        *self.phase.read() == Playing
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        *self.current_time.read()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        *self.volume.read()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<FailureReport> {
        self.last_failure.read().clone()
    }
}

/// Trait for view components that react to playback state changes.
///
/// This trait allows views to react to published state without holding a
/// reference to the coordinator.
pub trait StateObserver: Send + 'static {
    /// Handles a state change event.
    ///
    /// # Arguments
    ///
    /// * `event` - The state change event to handle.
    fn handle_state_change(&mut self, event: &PlayerEvent);
}

impl<F> StateObserver for F
where
    F: FnMut(&PlayerEvent) + Send + 'static,
{
    fn handle_state_change(&mut self, event: &PlayerEvent) {
        self(event);
    }
}
