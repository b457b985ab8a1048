//! Apply a curve to an external accel tool

use anyhow::Result;
use neuroaccel_writers::{DeviceSettings, apply_with_writer, lut_writer, lut_writer_factories};
use std::path::Path;

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

/// Arguments of `accelctl apply`
pub struct ApplyArgs<'a> {
    pub dest: &'a Path,
    pub settings_file: Option<&'a Path>,
    pub writer: &'a str,
    pub profile: &'a str,
    pub sensitivity: f64,
    pub y_x_ratio: f64,
    pub dry_run: bool,
}

/// Calculate the curve and hand it to the selected writer
pub fn execute(args: &ApplyArgs<'_>, ctx: &Context) -> Result<()> {
    let writer = lut_writer(args.writer).ok_or_else(|| {
        let known: Vec<&str> = lut_writer_factories().iter().map(|(name, _)| *name).collect();
        CliError::UnknownWriter(args.writer.to_string(), known.join(", "))
    })?;

    let settings = ctx.load_settings(args.settings_file)?;
    let device = DeviceSettings {
        profile_name: args.profile.to_string(),
        dpi: settings.dpi(),
        sensitivity: args.sensitivity,
        y_x_ratio: args.y_x_ratio,
    };
    device
        .validate()
        .map_err(|e| CliError::InvalidParameter(e.to_string()))?;

    let diffs = apply_with_writer(&*writer, &settings, args.dest, &device, args.dry_run)?;
    output::print_diffs(&diffs, args.dry_run, ctx.json);
    Ok(())
}
