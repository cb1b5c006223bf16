//! Operational error context propagation and failure diagnostics.
//!
//! This module provides extension traits for enhancing error context,
//! the `FailureReport` record published when a stream fails, and
//! centralized error logging.

use std::{error::Error as StdError, fmt::Display};

use {
    anyhow::{Context, Result as AnyhowResult},
    tracing::{debug, error, warn},
    url::Url,
};

use crate::{catalog::StationId, error::domain::PlaybackError};

/// Extension trait for enhanced error context.
///
/// This trait provides methods to add contextual information to errors,
/// making debugging and user feedback more informative.
pub trait ResultExt<T, E> {
    /// Adds context to an error with a static string.
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;

    /// Adds context to an error with a formatted string.
    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(context)
    }

    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(format.to_string())
    }
}

/// What the coordinator did after a stream failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureResolution {
    /// The station is being reopened with its alternate address.
    RetryingFallback {
        /// The alternate address now being opened.
        url: Url,
    },
    /// No retry is possible; the session returned to idle.
    GaveUp(PlaybackError),
}

/// Best-effort diagnostic record of a stream failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    /// Station whose stream failed.
    pub station: StationId,
    /// Why the stream failed.
    pub cause: PlaybackError,
    /// How the failure was handled.
    pub resolution: FailureResolution,
}

impl FailureReport {
    /// Whether the session gave up on the station.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.resolution, FailureResolution::GaveUp(_))
    }
}

/// Centralized error reporting and logging.
///
/// The `ErrorReporter` provides a consistent interface for logging
/// errors at different severity levels and reporting them to users.
pub struct ErrorReporter;

impl ErrorReporter {
    /// Reports a debug-level error (development only).
    pub fn debug(error: &dyn StdError, context: &str) {
        debug!(context = context, error = %error, "Debug error");
    }

    /// Reports a warning-level error (recoverable issues).
    pub fn warn(error: &dyn StdError, context: &str) {
        warn!(context = context, error = %error, "Warning error");
    }

    /// Logs a failure report at a level matching its outcome.
    pub fn report_failure(report: &FailureReport) {
        match &report.resolution {
            FailureResolution::RetryingFallback { url } => {
                warn!(
                    station = %report.station,
                    fallback = %url,
                    error = %report.cause,
                    "Stream failed, trying fallback"
                );
            }
            FailureResolution::GaveUp(reason) => {
                error!(
                    station = %report.station,
                    error = %report.cause,
                    reason = %reason,
                    "Stream failed, giving up"
                );
            }
        }
    }

    /// Converts a failure report to a message suitable for the view layer.
    pub fn to_user_message(report: &FailureReport) -> String {
        match report.resolution {
            FailureResolution::RetryingFallback { .. } => {
                "Connection problem, trying an alternate stream".to_string()
            }
            FailureResolution::GaveUp(_) => {
                "This station is unavailable right now, please try again later".to_string()
            }
        }
    }
}
