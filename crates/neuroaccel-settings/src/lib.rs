//! Settings persistence for NeuroAccel
//!
//! This crate stores [`CurveSettings`] as a versioned JSON document, migrates
//! documents written by older releases, and exposes the flat `prefix_field`
//! key map hosts use for field-by-field edits and legacy imports.
//!
//! # Example
//!
//! ```
//! use neuroaccel_settings::{SettingsStore, set_field};
//!
//! let dir = tempfile::tempdir()?;
//! let store = SettingsStore::new(dir.path().join("settings.json"));
//!
//! let mut settings = store.load()?; // defaults: nothing saved yet
//! set_field(&mut settings, "micro_range", 24.0)?;
//! store.save(&settings)?;
//!
//! assert_eq!(store.load()?, settings);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod document;
pub mod error;
pub mod flat;
pub mod store;

pub use document::{
    CURRENT_SCHEMA_VERSION, SettingsDocument, from_json, migrate_document, to_json,
};
pub use error::{SettingsError, SettingsResult};
pub use flat::{
    apply_flat_map, flat_keys, get_field, parse_flat_json, set_field, set_field_str, to_flat_map,
};
pub use neuroaccel_curves::{CurveSettings, CurveVariant};
pub use store::{SettingsStore, read_settings_file, write_atomic};
