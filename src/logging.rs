//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; hosts that want them on stderr
//! call [`init_tracing`] once at startup.

use {anyhow::anyhow, tracing_subscriber::EnvFilter};

use crate::error::{Result, ResultExt};

/// Directive used when neither `RUST_LOG` nor the caller provides one.
pub const DEFAULT_DIRECTIVE: &str = "saudiradio=info";

/// Builds the event filter.
///
/// # Arguments
///
/// * `env_directive` - Value of `RUST_LOG`, if set. Takes precedence.
/// * `default_directive` - Directive used otherwise.
///
/// # Errors
///
/// Returns an error if the chosen directive cannot be parsed.
pub fn build_filter(env_directive: Option<&str>, default_directive: &str) -> Result<EnvFilter> {
    match env_directive.filter(|directive| !directive.trim().is_empty()) {
        Some(directive) => {
            EnvFilter::try_new(directive).add_contextf(format!("invalid RUST_LOG '{directive}'"))
        }
        None => EnvFilter::try_new(default_directive).add_context("invalid default log directive"),
    }
}

/// Installs a formatted stderr subscriber as the global default.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directive.as_deref(), default_directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
