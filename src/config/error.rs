//! Errors raised while loading cook parameters

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a parameter table
///
/// Every variant names the offending file or key so the run can be fixed
/// without a debugger.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read parameter file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed parameter file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing required parameter '{name}'")]
    MissingParameter { name: String },

    #[error("invalid value {value} for parameter '{name}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error(
        "exactly one kinetics model must be selected \
         (Andersson_model = {andersson}, Gustafsson_model = {gustafsson})"
    )]
    ModelSelection { andersson: f64, gustafsson: f64 },

    #[error("parameter '{name}' is defined more than once")]
    DuplicateParameter { name: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
