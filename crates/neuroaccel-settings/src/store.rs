//! File-backed settings store with atomic writes.

use std::fs;
use std::path::{Path, PathBuf};

use neuroaccel_curves::{CurveSettings, CurveVariant};
use tracing::{debug, info};

use crate::document::{from_json, to_json};
use crate::error::{SettingsError, SettingsResult};

/// Loads and saves [`CurveSettings`] at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store for `path`. Nothing is touched on disk until the first
    /// load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the settings document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a settings document exists at the store's path.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load settings, falling back to the defaults if no document exists.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Serialization`] for a corrupt document and
    /// [`SettingsError::Io`] if the file exists but cannot be read.
    pub fn load(&self) -> SettingsResult<CurveSettings> {
        match read_settings_file(&self.path) {
            Err(SettingsError::NotFound { .. }) => {
                debug!(path = ?self.path, "No settings file, using defaults");
                Ok(CurveSettings::default())
            }
            other => other,
        }
    }

    /// Validate and persist settings atomically.
    ///
    /// The parent directory is created if needed, the document is written to
    /// a temporary file next to the target and then renamed over it, so the
    /// previous document survives a failed write.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Curve`] if the settings are invalid,
    /// [`SettingsError::Serialization`] if they cannot be encoded, and
    /// [`SettingsError::Io`] if writing fails.
    pub fn save(&self, settings: &CurveSettings) -> SettingsResult<()> {
        settings.validate()?;
        let content = to_json(settings)?;
        write_atomic(&self.path, &content)?;
        info!(path = ?self.path, variant = %settings.variant(), "Settings saved");
        Ok(())
    }

    /// Replace the stored settings with the defaults of `variant`.
    ///
    /// # Errors
    ///
    /// Same as [`SettingsStore::save`]: [`SettingsError::Curve`] if the
    /// defaults fail validation, [`SettingsError::Serialization`] if they
    /// cannot be encoded, and [`SettingsError::Io`] if writing fails.
    pub fn reset(&self, variant: CurveVariant) -> SettingsResult<CurveSettings> {
        let settings = CurveSettings::defaults(variant);
        self.save(&settings)?;
        Ok(settings)
    }
}

/// Read a settings document that must exist.
///
/// # Errors
///
/// Returns [`SettingsError::NotFound`] if `path` does not exist,
/// [`SettingsError::Io`] if it cannot be read and
/// [`SettingsError::Serialization`] if it is not a settings document.
pub fn read_settings_file(path: &Path) -> SettingsResult<CurveSettings> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SettingsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(SettingsError::io(path, e)),
    };
    debug!(path = ?path, "Read settings file");
    from_json(&content)
}

/// Write `content` to `path` via a temporary file and a rename.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] naming the path that failed.
pub fn write_atomic(path: &Path, content: &str) -> SettingsResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| SettingsError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| SettingsError::io(path, e))?;

    debug!(path = ?path, "File written atomically");
    Ok(())
}
