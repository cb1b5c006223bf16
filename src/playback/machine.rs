//! Playback session state machine.
//!
//! `SessionMachine` owns the engine, the now-playing surface and the
//! session, and performs every transition synchronously. It is driven from
//! a single context (the coordinator's run loop), so no transition ever
//! races another.

use std::{mem::take, sync::Arc};

use {
    async_channel::Sender,
    tracing::{debug, warn},
    url::Url,
};

use crate::{
    catalog::{FallbackTable, Station},
    config::PlaybackConfig,
    error::{ErrorReporter, FailureReport, FailureResolution, PlaybackError},
    playback::{
        engine::{AttemptEvents, AttemptId, EngineEvent, StreamEngine},
        now_playing::{NowPlayingInfo, NowPlayingSurface, RemoteCommand, RemoteCommandStatus},
        session::{
            PlaybackPhase::{self, Failed, Idle, Loading, Paused, Playing},
            Session, StreamAttempt,
            StreamSource::{self, Fallback, Primary},
            clamp_volume,
        },
    },
    state::PlayerState,
};

/// Synchronous playback state machine.
pub struct SessionMachine {
    /// The single session.
    session: Session,
    /// Exclusively owned streaming engine.
    engine: Box<dyn StreamEngine>,
    /// System now-playing surface.
    surface: Box<dyn NowPlayingSurface>,
    /// Alternate addresses consulted on failure.
    fallbacks: FallbackTable,
    /// Published mirror of `session`.
    state: Arc<PlayerState>,
    /// Queue feeding engine notifications back to the run loop.
    events_tx: Sender<EngineEvent>,
    /// Token for the next open.
    next_attempt: AttemptId,
}

impl SessionMachine {
    /// Creates an idle machine.
    ///
    /// # Arguments
    ///
    /// * `engine` - Streaming engine, owned exclusively from now on.
    /// * `surface` - System now-playing surface.
    /// * `config` - Initial volume and fallback table.
    /// * `state` - Published state to keep in sync.
    /// * `events_tx` - Sender handed to the engine, bound per attempt.
    pub fn new(
        mut engine: Box<dyn StreamEngine>,
        surface: Box<dyn NowPlayingSurface>,
        config: PlaybackConfig,
        state: Arc<PlayerState>,
        events_tx: Sender<EngineEvent>,
    ) -> Self {
        let session = Session::new(config.initial_volume);
        engine.set_volume(session.volume());
        state.update_volume(session.volume());

        Self {
            session,
            engine,
            surface,
            fallbacks: config.fallbacks,
            state,
            events_tx,
            next_attempt: AttemptId::new(1),
        }
    }

    /// Read access to the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Plays `station`.
    ///
    /// Selecting the station that is already current toggles between
    /// playing (or loading) and paused instead of reopening the stream.
    pub fn play_station(&mut self, station: Station) {
        let same_station = self
            .session
            .station()
            .is_some_and(|current| current.id() == station.id());

        if same_station {
            match self.session.phase() {
                Playing | Loading => self.pause(),
                Paused | Idle | Failed => self.play(),
            }
            return;
        }

        debug!("SessionMachine: switching to {}", station.id());
        self.release_stream();
        self.session.paused_by_interruption = false;
        let url = station.stream_url().clone();
        self.set_station(Some(station));
        self.set_current_time(0.0);
        self.open(url, Primary);
    }

    /// Loads `station` without opening its stream.
    ///
    /// The session ends up idle with a station, so a later `play` opens it.
    pub fn cue(&mut self, station: Station) {
        self.release_stream();
        self.surface.clear();
        self.session.paused_by_interruption = false;
        self.set_station(Some(station));
        self.set_current_time(0.0);
        self.set_phase(Idle);
    }

    /// Starts or resumes the current station.
    pub fn play(&mut self) {
        self.session.paused_by_interruption = false;

        match self.session.phase() {
            Playing | Loading => {}
            Paused => match self.session.attempt().map(|attempt| attempt.ready) {
                Some(true) => self.start_output(),
                Some(false) => self.set_phase(Loading),
                None => self.reopen_current(),
            },
            Idle | Failed => self.reopen_current(),
        }
    }

    /// Pauses output, keeping the station and stream.
    pub fn pause(&mut self) {
        self.session.paused_by_interruption = false;
        self.pause_output();
    }

    /// Releases the stream and clears the station and now-playing metadata.
    pub fn stop(&mut self) {
        debug!("SessionMachine: stopping");
        self.release_stream();
        self.session.paused_by_interruption = false;
        self.surface.clear();
        self.set_station(None);
        self.set_current_time(0.0);
        self.set_phase(Idle);
    }

    /// Clamps and applies an output volume. NaN is ignored.
    pub fn set_volume(&mut self, volume: f32) {
        let Some(volume) = clamp_volume(volume) else {
            warn!("SessionMachine: ignoring NaN volume");
            return;
        };

        self.session.volume = volume;
        self.engine.set_volume(volume);
        self.state.update_volume(volume);
    }

    /// Another application took audio focus.
    pub fn interruption_began(&mut self) {
        if matches!(self.session.phase(), Playing | Loading) {
            debug!("SessionMachine: interruption began, pausing");
            self.pause_output();
            self.session.paused_by_interruption = true;
        }
    }

    /// Audio focus came back.
    ///
    /// Playback resumes only if the interruption paused it and the system
    /// hints that resuming is appropriate.
    pub fn interruption_ended(&mut self, should_resume: bool) {
        let resume = should_resume
            && self.session.paused_by_interruption
            && self.session.phase() == Paused
            && self.session.station().is_some();
        self.session.paused_by_interruption = false;

        if resume {
            debug!("SessionMachine: interruption ended, resuming");
            self.play();
        }
    }

    /// Maps a system media command onto `play` / `pause`.
    pub fn remote_command(&mut self, command: RemoteCommand) -> RemoteCommandStatus {
        if self.session.station().is_none() {
            return RemoteCommandStatus::NoActionableItem;
        }

        match command {
            RemoteCommand::Play => self.play(),
            RemoteCommand::Pause => self.pause(),
            RemoteCommand::TogglePlayPause => match self.session.phase() {
                Playing | Loading => self.pause(),
                _ => self.play(),
            },
        }

        RemoteCommandStatus::Success
    }

    /// Applies an engine notification, discarding stale ones.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let attempt = event.attempt();
        if !self.session.is_current(attempt) {
            ErrorReporter::debug(
                &PlaybackError::SessionSuperseded { attempt },
                "discarding engine notification",
            );
            return;
        }

        match event {
            EngineEvent::Ready { .. } => self.on_ready(),
            EngineEvent::Failed { reason, .. } => self.on_failed(reason),
            EngineEvent::Position { seconds, .. } => self.on_position(seconds),
        }
    }

    /// Tears everything down before the machine is dropped.
    pub fn shutdown(&mut self) {
        debug!("SessionMachine: shutting down");
        self.stop();
    }

    fn on_ready(&mut self) {
        if let Some(attempt) = self.session.attempt.as_mut() {
            attempt.ready = true;
        }

        match self.session.phase() {
            Loading => self.start_output(),
            Paused => debug!("SessionMachine: stream ready while paused"),
            phase => debug!("SessionMachine: ignoring ready in {phase:?}"),
        }
    }

    fn on_position(&mut self, seconds: f64) {
        if self.session.phase() == Playing
            && seconds.is_finite()
            && seconds > self.session.current_time()
        {
            self.set_current_time(seconds);
        }
    }

    fn on_failed(&mut self, reason: String) {
        let Some(attempt) = self.session.attempt.take() else {
            return;
        };
        let Some(station) = self.session.station.clone() else {
            self.engine.release();
            return;
        };

        let phase = self.session.phase();
        self.engine.release();

        let cause = PlaybackError::StreamOpenFailed {
            url: attempt.url.to_string(),
            reason,
        };

        if phase == Paused {
            // Dropped while paused: the next play reopens the primary address.
            ErrorReporter::warn(&cause, "stream dropped while paused");
            return;
        }

        self.set_phase(Failed);

        let fallback = match attempt.source {
            Primary => self.fallbacks.lookup(station.id()).cloned(),
            Fallback => None,
        };

        let resolution = match &fallback {
            Some(url) => FailureResolution::RetryingFallback { url: url.clone() },
            None => FailureResolution::GaveUp(PlaybackError::NoFallbackAvailable {
                station: station.id(),
            }),
        };
        let report = FailureReport {
            station: station.id(),
            cause,
            resolution,
        };
        ErrorReporter::report_failure(&report);
        self.state.record_failure(report);

        match fallback {
            Some(url) => {
                if phase == Playing {
                    self.publish_now_playing(false);
                }
                self.open(url, Fallback);
            }
            None => {
                self.session.paused_by_interruption = false;
                self.surface.clear();
                self.set_station(None);
                self.set_current_time(0.0);
                self.set_phase(Idle);
            }
        }
    }

    fn reopen_current(&mut self) {
        let Some(url) = self.session.station().map(|s| s.stream_url().clone()) else {
            debug!("SessionMachine: nothing to play");
            return;
        };

        self.release_stream();
        self.open(url, Primary);
    }

    fn open(&mut self, url: Url, source: StreamSource) {
        let id = self.next_attempt;
        self.next_attempt = id.next();

        debug!("SessionMachine: opening {url} as attempt {id} ({source:?})");
        self.session.attempt = Some(StreamAttempt {
            id,
            url: url.clone(),
            source,
            ready: false,
        });
        self.set_phase(Loading);

        self.engine
            .open(&url, AttemptEvents::new(id, self.events_tx.clone()));
        self.engine.set_volume(self.session.volume());
    }

    fn start_output(&mut self) {
        self.engine.play();
        self.set_phase(Playing);
        self.publish_now_playing(true);
    }

    fn pause_output(&mut self) {
        match self.session.phase() {
            Playing => {
                self.engine.pause();
                self.set_phase(Paused);
                self.publish_now_playing(false);
            }
            Loading => {
                self.engine.pause();
                self.set_phase(Paused);
            }
            _ => {}
        }
    }

    /// Releases the engine stream if one is open; late notifications for it
    /// become stale because the attempt is dropped.
    fn release_stream(&mut self) {
        if take(&mut self.session.attempt).is_some() {
            self.engine.release();
        }
    }

    fn publish_now_playing(&mut self, playing: bool) {
        if let Some(station) = self.session.station() {
            let info = NowPlayingInfo::for_station(station, playing);
            self.surface.publish(&info);
        }
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        self.session.phase = phase;
        self.state.update_phase(phase);
    }

    fn set_station(&mut self, station: Option<Station>) {
        self.session.station.clone_from(&station);
        self.state.update_station(station);
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.session.current_time = seconds;
        self.state.update_current_time(seconds);
    }
}
