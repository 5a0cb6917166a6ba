//! Tracing subscriber installation.

use crate::config::BoardConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a formatting subscriber filtered by [`BoardConfig::log_filter`].
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter and
/// [`TelemetryError::Install`] when a global subscriber already exists.
pub fn init_tracing(config: &BoardConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| TelemetryError::Install(err.to_string()))
}
