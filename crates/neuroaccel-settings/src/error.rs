//! Error types for settings persistence.

use std::path::PathBuf;

use neuroaccel_curves::CurveError;
use thiserror::Error;

/// Errors that can occur while loading, saving or editing settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A file operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// File or directory the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A settings file that was required does not exist.
    #[error("Settings file not found: {path}")]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// The document was written by a newer release.
    #[error("Unsupported schema version {0}: maximum supported is {1}")]
    UnsupportedVersion(u32, u32),

    /// A flat key does not name a field of the current curve variant.
    #[error("Unknown settings field: {0}")]
    UnknownField(String),

    /// A flat value is not a finite number.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue {
        /// Flat key being set.
        key: String,
        /// Rejected value as given.
        value: String,
    },

    /// The settings describe an invalid curve.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;
