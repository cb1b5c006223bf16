//! Domain-specific error types using `thiserror`.
//!
//! This module defines the error enums for the catalog and playback
//! domains. Settings errors live next to the settings manager.

use std::result::Result as StdResult;

use {anyhow::Error, thiserror::Error, url::ParseError};

use crate::{catalog::StationId, playback::AttemptId};

/// Playback failures.
///
/// None of these escape the coordinator; they are recorded in a
/// `FailureReport` and published to observers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The engine could not resolve or connect to a stream address.
    #[error("Failed to open stream {url}: {reason}")]
    StreamOpenFailed { url: String, reason: String },
    /// A stream failed and no (further) alternate address is configured.
    #[error("No fallback stream available for station {station}")]
    NoFallbackAvailable { station: StationId },
    /// An engine notification arrived for an attempt that is no longer current.
    #[error("Notification for attempt {attempt} arrived after it was superseded")]
    SessionSuperseded { attempt: AttemptId },
}

/// Catalog construction and lookup errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A station's stream address is not a valid URL.
    #[error("Invalid stream URL for station {station} ({url}): {source}")]
    InvalidStreamUrl {
        station: StationId,
        url: String,
        #[source]
        source: ParseError,
    },
    /// Two stations share the same identity.
    #[error("Duplicate station id {0}")]
    DuplicateStation(StationId),
    /// No station with this identity exists in the catalog.
    #[error("Unknown station {0}")]
    UnknownStation(StationId),
}

/// Operational error context propagation with `anyhow`.
///
/// This type is used for operational errors that need rich context
/// but don't require specific handling logic.
pub type Result<T> = StdResult<T, Error>;
