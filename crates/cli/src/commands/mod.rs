//! Command implementations for accelctl CLI

pub mod apply;
pub mod curve;
pub mod settings;

use anyhow::Result;
use clap::Subcommand;
use neuroaccel_curves::{CurveSettings, CurveVariant};
use neuroaccel_settings::{SettingsStore, read_settings_file};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Options shared by every command
pub struct Context {
    pub json: bool,
    pub config: Option<PathBuf>,
}

impl Context {
    /// Path of the persisted settings document.
    ///
    /// `--config` / `NEUROACCEL_CONFIG` if given, otherwise
    /// `<config dir>/neuroaccel/settings.json`.
    pub fn settings_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.config {
            return Ok(path.clone());
        }
        let dir = dirs::config_dir().ok_or(CliError::NoConfigDir)?;
        Ok(dir.join("neuroaccel").join("settings.json"))
    }

    pub fn store(&self) -> Result<SettingsStore> {
        Ok(SettingsStore::new(self.settings_path()?))
    }

    /// Settings from an explicit file, or the persisted settings.
    ///
    /// An explicit file must exist; a missing persisted document falls back
    /// to the defaults.
    pub fn load_settings(&self, file: Option<&Path>) -> Result<CurveSettings> {
        match file {
            Some(path) => Ok(read_settings_file(path)?),
            None => Ok(self.store()?.load()?),
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show the persisted settings
    Show,

    /// Set one field by its flat key, e.g. `micro_range 24`
    Set {
        /// Flat key (`dpi`, `min_sens`, `tracking_max_sens`, ...)
        key: String,
        /// New value
        value: String,
    },

    /// Replace the persisted settings with defaults
    Reset {
        /// Curve variant to reset to
        #[arg(long, default_value_t = CurveVariant::Segmented)]
        variant: CurveVariant,
    },

    /// Import a settings document or a flat key/value JSON object
    Import {
        /// File to import
        file: PathBuf,
    },
}
