//! Versioned settings document and its JSON form.

use neuroaccel_curves::CurveSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Current settings schema version.
/// Increment this when the document structure changes incompatibly.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// On-disk settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// Schema format version for migration tracking.
    /// Documents without this field deserialize as 0.
    #[serde(default)]
    pub schema_version: u32,
    /// The curve configuration.
    pub settings: CurveSettings,
}

impl SettingsDocument {
    /// Wrap settings in a current-version document.
    pub fn new(settings: CurveSettings) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            settings,
        }
    }
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self::new(CurveSettings::default())
    }
}

/// Migrate a document to the current schema version.
///
/// Returns `Ok(true)` if migration was performed, `Ok(false)` if the document
/// was already at the current version.
///
/// # Errors
///
/// Returns [`SettingsError::UnsupportedVersion`] if the document comes from a
/// newer release.
pub fn migrate_document(document: &mut SettingsDocument) -> SettingsResult<bool> {
    if document.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(SettingsError::UnsupportedVersion(
            document.schema_version,
            CURRENT_SCHEMA_VERSION,
        ));
    }
    if document.schema_version == CURRENT_SCHEMA_VERSION {
        return Ok(false);
    }

    // v0 -> v1: same structure, version field added.
    debug!(from = document.schema_version, to = CURRENT_SCHEMA_VERSION, "Migrating settings document");
    document.schema_version = CURRENT_SCHEMA_VERSION;
    Ok(true)
}

/// Serialize settings as a pretty-printed current-version document.
///
/// # Errors
///
/// Returns [`SettingsError::Serialization`] if encoding fails.
pub fn to_json(settings: &CurveSettings) -> SettingsResult<String> {
    let document = SettingsDocument::new(settings.clone());
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse settings from JSON, migrating older documents.
///
/// Accepts a versioned document (`{"schema_version": 1, "settings": {...}}`)
/// or, as schema version 0, a bare settings object tagged with `"curve"`.
///
/// # Errors
///
/// Returns [`SettingsError::Serialization`] for malformed JSON and
/// [`SettingsError::UnsupportedVersion`] for documents from newer releases.
pub fn from_json(text: &str) -> SettingsResult<CurveSettings> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let mut document = if value.get("settings").is_some() {
        serde_json::from_value::<SettingsDocument>(value)?
    } else {
        SettingsDocument {
            schema_version: 0,
            settings: serde_json::from_value(value)?,
        }
    };

    migrate_document(&mut document)?;
    Ok(document.settings)
}
