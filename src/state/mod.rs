//! Published playback state with reactive updates to view components.
//!
//! This module provides the observable mirror of the playback session and
//! the subscription mechanisms the view layer uses to follow it.

pub mod player_state;

pub use player_state::{PlayerEvent, PlayerState, StateObserver};
