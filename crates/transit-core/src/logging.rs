#![forbid(unsafe_code)]

//! Subscriber installation for binaries and demos embedding the engine.
//!
//! The engine itself only emits `tracing` events; nothing is printed unless
//! the host installs a subscriber. [`init`] installs one from a
//! [`LoggingConfig`]. `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::{LogFormat, LoggingConfig};

/// Install a global subscriber built from `config`.
///
/// Fails if the configured filter does not parse or a global subscriber is
/// already set.
pub fn init(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(LoggingError::Filter)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
    };
    result.map_err(LoggingError::Init)?;

    tracing::info!(filter = %config.filter, format = ?config.format, "tracing initialized");
    Ok(())
}

/// Error returned by [`init`].
#[derive(Debug)]
pub enum LoggingError {
    Filter(ParseError),
    Init(TryInitError),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filter(e) => write!(f, "invalid log filter: {e}"),
            Self::Init(e) => write!(f, "subscriber init failed: {e}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Filter(e) => Some(e),
            Self::Init(e) => Some(e),
        }
    }
}
