//! Error handling using `thiserror` and `anyhow`.
//!
//! This module provides domain-specific error types for precise error
//! handling and operational diagnostics for failures that are reported
//! rather than propagated.

pub mod domain;
pub mod operational;

pub use {
    domain::{CatalogError, PlaybackError, Result},
    operational::{ErrorReporter, FailureReport, FailureResolution, ResultExt},
};
