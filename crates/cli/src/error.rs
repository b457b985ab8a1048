//! Error types for accelctl CLI

use neuroaccel_curves::CurveError;
use neuroaccel_settings::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Settings file not found: {}", .0.display())]
    SettingsNotFound(PathBuf),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown writer '{0}', expected one of: {1}")]
    UnknownWriter(String, String),

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::SettingsNotFound(_) => 3,
            CliError::InvalidParameter(_) | CliError::UnknownWriter(..) => 4,
            CliError::Io { .. } => 5,
            CliError::NoConfigDir => 1,
        }
    }
}

fn settings_exit_code(error: &SettingsError) -> u8 {
    match error {
        SettingsError::NotFound { .. } => 3,
        SettingsError::Io { .. } => 5,
        SettingsError::Serialization(_)
        | SettingsError::UnsupportedVersion(..)
        | SettingsError::UnknownField(_)
        | SettingsError::InvalidValue { .. }
        | SettingsError::Curve(_) => 4,
    }
}

/// Process exit code for an error, from the first recognised cause.
///
/// `0` success, `1` other, `3` settings not found, `4` invalid parameter or
/// serialization, `5` I/O.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<SettingsError>() {
            return settings_exit_code(e);
        }
        if cause.downcast_ref::<CurveError>().is_some()
            || cause.downcast_ref::<serde_json::Error>().is_some()
        {
            return 4;
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return 5;
        }
    }
    1
}
