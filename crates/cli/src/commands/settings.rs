//! Persisted settings commands

use anyhow::Result;
use neuroaccel_curves::CurveVariant;
use neuroaccel_settings::{apply_flat_map, from_json, parse_flat_json, set_field_str};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::commands::{Context, SettingsCommands};
use crate::error::CliError;
use crate::output;

/// Execute settings command
pub fn execute(cmd: &SettingsCommands, ctx: &Context) -> Result<()> {
    match cmd {
        SettingsCommands::Show => show(ctx),
        SettingsCommands::Set { key, value } => set(key, value, ctx),
        SettingsCommands::Reset { variant } => reset(*variant, ctx),
        SettingsCommands::Import { file } => import(file, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let settings = store.load()?;
    output::print_settings(&settings, Some(store.path()), ctx.json);
    Ok(())
}

fn set(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let mut settings = store.load()?;
    set_field_str(&mut settings, key, value)?;
    store.save(&settings)?;
    output::print_success(&format!("Set {} = {}", key, value), ctx.json);
    Ok(())
}

fn reset(variant: CurveVariant, ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    store.reset(variant)?;
    output::print_success(&format!("Settings reset to {} defaults", variant), ctx.json);
    Ok(())
}

/// Import a settings document, or merge a flat `{"key": value}` object into
/// the persisted settings.
fn import(file: &Path, ctx: &Context) -> Result<()> {
    let text = fs::read_to_string(file).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::SettingsNotFound(file.to_path_buf()),
        _ => CliError::Io {
            path: file.to_path_buf(),
            source: e,
        },
    })?;

    let value: serde_json::Value = serde_json::from_str(&text)?;
    let store = ctx.store()?;

    let settings = if value.get("settings").is_some() || value.get("curve").is_some() {
        from_json(&text)?
    } else {
        let mut settings = store.load()?;
        let applied = apply_flat_map(&mut settings, parse_flat_json(&text)?);
        if applied == 0 {
            return Err(CliError::InvalidParameter(format!(
                "no recognised settings fields in {}",
                file.display()
            ))
            .into());
        }
        info!(applied, "Imported flat settings");
        settings
    };

    store.save(&settings)?;
    output::print_success(
        &format!("Imported settings from {}", file.display()),
        ctx.json,
    );
    Ok(())
}
