#![forbid(unsafe_code)]

//! Configuration for the Transit engine.
//!
//! Captures the few tunables of the engine as a single [`TransitConfig`] that
//! can be loaded from TOML or JSON at startup (feature `config`).
//!
//! # Loading
//!
//! ```toml
//! # transit.toml
//! sequencing = "reject"
//!
//! [logging]
//! filter = "transit_core=debug"
//! format = "json"
//! ```
//!
//! ```rust,ignore
//! let config = TransitConfig::from_toml_file("transit.toml")?;
//! let bus = DragBus::with_config(&config);
//! ```
//!
//! # Defaults
//!
//! `TransitConfig::default()` keeps the permissive sequencing of the drag
//! bus and reports ill-formed gesture sequences at `WARN`.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// How the drag bus reacts to calls that do not fit the gesture lifecycle,
/// e.g. `dragstart` while already in transit or `dragend` while idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum SequencingPolicy {
    /// Accept silently: `dragstart` overwrites the item in transit, the other
    /// events propagate an absent draggable.
    Permissive,
    /// Accept like `Permissive`, but log a warning.
    #[default]
    Warn,
    /// Drop the call (nothing published, no state change) and log a warning.
    Reject,
}

/// Output format for [`crate::logging::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Logging subscriber settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "transit_core=info".into(),
            format: LogFormat::Compact,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TransitConfig {
    pub sequencing: SequencingPolicy,
    pub logging: LoggingConfig,
}

impl TransitConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check parameters. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".into());
        }
        errors
    }
}

/// Errors from loading a [`TransitConfig`].
#[cfg(feature = "config")]
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
}

#[cfg(feature = "config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            Self::Toml(e) => write!(f, "config TOML parse error: {e}"),
            Self::Json(e) => write!(f, "config JSON parse error: {e}"),
        }
    }
}

#[cfg(feature = "config")]
impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}
