//! Playback session coordinator.
//!
//! `PlaybackCoordinator` is the handle the view layer and the system media
//! controls talk to. Every call is posted to a run loop that owns the
//! `SessionMachine`; engine notifications are funneled into the same loop, so
//! session state is only ever mutated from one task.

use std::sync::Arc;

use {
    async_channel::{Receiver, Sender, unbounded},
    tokio::{
        select, spawn,
        sync::{broadcast, oneshot},
    },
    tracing::{debug, warn},
};

use crate::{
    catalog::Station,
    config::PlaybackConfig,
    error::FailureReport,
    playback::{
        engine::{EngineEvent, StreamEngine},
        machine::SessionMachine,
        now_playing::{NowPlayingSurface, RemoteCommand, RemoteCommandStatus},
        session::{PlaybackPhase, clamp_volume},
    },
    state::{PlayerEvent, PlayerState},
};

/// Internal control messages for the run loop.
enum Command {
    /// Play a station, toggling if it is already current.
    PlayStation(Station),
    /// Load a station without opening it.
    Cue(Station),
    /// Start or resume the current station.
    Play,
    /// Pause output.
    Pause,
    /// Release everything and go idle.
    Stop,
    /// Set output volume.
    SetVolume(f32),
    /// Audio focus was taken by another application.
    InterruptionBegan,
    /// Audio focus came back.
    InterruptionEnded { should_resume: bool },
    /// Command from the system media controls.
    Remote(RemoteCommand, oneshot::Sender<RemoteCommandStatus>),
    /// Reply once every earlier message has been applied.
    Flush(oneshot::Sender<()>),
    /// Stop the run loop.
    Shutdown,
}

/// Handle to the single playback session.
///
/// Cloning is cheap; all clones drive the same session. Construct one at
/// application start and pass it to every view that needs it. The session is
/// torn down when `shutdown` is called or the last clone is dropped.
#[derive(Clone)]
pub struct PlaybackCoordinator {
    /// Sender for control messages.
    control_tx: Sender<Command>,
    /// Published state.
    state: Arc<PlayerState>,
}

impl PlaybackCoordinator {
    /// Starts a coordinator on the current tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `engine` - Streaming engine; the coordinator becomes its only owner.
    /// * `surface` - System now-playing surface.
    /// * `config` - Initial volume and fallback table.
    ///
    /// # Returns
    ///
    /// A handle to the running coordinator.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn<E, S>(engine: E, surface: S, config: PlaybackConfig) -> Self
    where
        E: StreamEngine + 'static,
        S: NowPlayingSurface + 'static,
    {
        let volume = clamp_volume(config.initial_volume).unwrap_or(1.0);
        let state = Arc::new(PlayerState::new(volume));
        let (control_tx, control_rx) = unbounded();
        let (events_tx, events_rx) = unbounded();

        let machine = SessionMachine::new(
            Box::new(engine),
            Box::new(surface),
            config,
            Arc::clone(&state),
            events_tx,
        );
        spawn(run(machine, control_rx, events_rx));

        Self { control_tx, state }
    }

    /// Plays `station`, or toggles play/pause if it is already current.
    pub fn play_station(&self, station: Station) {
        self.send(Command::PlayStation(station));
    }

    /// Loads `station` without starting it, e.g. to restore the last
    /// station at launch.
    pub fn cue(&self, station: Station) {
        self.send(Command::Cue(station));
    }

    /// Starts or resumes the current station.
    pub fn play(&self) {
        self.send(Command::Play);
    }

    /// Pauses output, keeping the station loaded.
    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    /// Releases the stream and clears the station and now-playing metadata.
    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Sets the output volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }

    /// Reports that another application took audio focus.
    pub fn interruption_began(&self) {
        self.send(Command::InterruptionBegan);
    }

    /// Reports that audio focus came back.
    ///
    /// # Arguments
    ///
    /// * `should_resume` - The system's hint that playback may resume.
    pub fn interruption_ended(&self, should_resume: bool) {
        self.send(Command::InterruptionEnded { should_resume });
    }

    /// Applies a command from the system media controls.
    ///
    /// # Returns
    ///
    /// The status to hand back to the system.
    pub async fn remote_command(&self, command: RemoteCommand) -> RemoteCommandStatus {
        let (reply_tx, reply_rx) = oneshot::channel();
        if !self.send(Command::Remote(command, reply_tx)) {
            return RemoteCommandStatus::CommandFailed;
        }

        reply_rx.await.unwrap_or(RemoteCommandStatus::CommandFailed)
    }

    /// Waits until every previously posted call and engine notification has
    /// been applied.
    pub async fn flush(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.send(Command::Flush(reply_tx)) {
            let _ = reply_rx.await;
        }
    }

    /// Stops the run loop, releasing the engine and clearing now-playing.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    /// Subscribes to published state changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.state.subscribe()
    }

    /// The published state shared with observers.
    #[must_use]
    pub const fn state(&self) -> &Arc<PlayerState> {
        &self.state
    }

    #[must_use]
    pub fn current_station(&self) -> Option<Station> {
        self.state.current_station()
    }

    #[must_use]
    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.state.current_time()
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.state.volume()
    }

    #[must_use]
    pub fn last_failure(&self) -> Option<FailureReport> {
        self.state.last_failure()
    }

    fn send(&self, command: Command) -> bool {
        match self.control_tx.try_send(command) {
            Ok(()) => true,
            Err(e) => {
                warn!("PlaybackCoordinator: run loop gone, dropping command: {e}");
                false
            }
        }
    }
}

/// Run loop owning the session.
///
/// Engine notifications are drained before control messages so that a
/// `Flush` posted after a notification observes its effect.
async fn run(
    mut machine: SessionMachine,
    control_rx: Receiver<Command>,
    events_rx: Receiver<EngineEvent>,
) {
    loop {
        select! {
            biased;

            Ok(event) = events_rx.recv() => machine.handle_engine_event(event),
            message = control_rx.recv() => match message {
                Ok(Command::Shutdown) | Err(_) => break,
                Ok(command) => dispatch(&mut machine, command),
            },
        }
    }

    debug!("PlaybackCoordinator: run loop exiting");
    machine.shutdown();
}

fn dispatch(machine: &mut SessionMachine, command: Command) {
    match command {
        Command::PlayStation(station) => machine.play_station(station),
        Command::Cue(station) => machine.cue(station),
        Command::Play => machine.play(),
        Command::Pause => machine.pause(),
        Command::Stop => machine.stop(),
        Command::SetVolume(volume) => machine.set_volume(volume),
        Command::InterruptionBegan => machine.interruption_began(),
        Command::InterruptionEnded { should_resume } => machine.interruption_ended(should_resume),
        Command::Remote(command, reply) => {
            let _ = reply.send(machine.remote_command(command));
        }
        Command::Flush(reply) => {
            let _ = reply.send(());
        }
        Command::Shutdown => {}
    }
}
