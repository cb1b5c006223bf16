//! Playback session coordination.
//!
//! Wraps an external streaming engine behind a single state machine that
//! handles stream readiness and failure, fallback retry, audio-focus
//! interruptions and the system now-playing surface.

#[cfg(test)]
mod coordinator_tests;

pub mod coordinator;
pub mod engine;
pub mod machine;
pub mod now_playing;
pub mod session;

pub use {
    coordinator::PlaybackCoordinator,
    engine::{AttemptEvents, AttemptId, EngineEvent, StreamEngine},
    machine::SessionMachine,
    now_playing::{NowPlayingInfo, NowPlayingSurface, RemoteCommand, RemoteCommandStatus},
    session::{PlaybackPhase, Session, StreamAttempt, StreamSource},
};
