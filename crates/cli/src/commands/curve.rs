//! Curve inspection and export commands

use anyhow::Result;
use neuroaccel_curves::{
    CurveSettings, CurveVariant, calculate_curve, calculate_segmented_curve,
    get_all_default_settings, get_default_settings,
};
use neuroaccel_settings::write_atomic;
use serde_json::json;
use std::path::Path;
use tracing::{info, warn};

use crate::commands::Context;
use crate::error::CliError;
use crate::output;

/// Print the default settings of a variant
pub fn defaults(variant: CurveVariant, ctx: &Context) -> Result<()> {
    let settings = get_default_settings(variant);
    output::print_settings(&settings, None, ctx.json);
    Ok(())
}

/// Print the parameter descriptors of a variant
pub fn params(variant: CurveVariant, ctx: &Context) -> Result<()> {
    let groups = get_all_default_settings(variant);
    output::print_parameter_groups(&groups, ctx.json);
    Ok(())
}

fn log_warnings(settings: &CurveSettings) -> Vec<neuroaccel_curves::CurveWarning> {
    let warnings = settings.warnings();
    for warning in &warnings {
        warn!(%warning, "Curve warning");
    }
    warnings
}

/// Calculate and print the curve
pub fn curve(settings_file: Option<&Path>, segments: bool, ctx: &Context) -> Result<()> {
    let settings = ctx.load_settings(settings_file)?;
    let warnings = log_warnings(&settings);

    if segments {
        let CurveSettings::Segmented(params) = &settings else {
            return Err(CliError::InvalidParameter(
                "--segments requires the segmented curve variant".to_string(),
            )
            .into());
        };
        let curve = calculate_segmented_curve(params)?;
        output::print_segmented_curve(&curve, &warnings, ctx.json);
    } else {
        let curve = calculate_curve(&settings)?;
        output::print_curve(&curve, &warnings, ctx.json);
    }
    Ok(())
}

/// Export the curve as LUT text to a file or stdout
pub fn export(settings_file: Option<&Path>, output_file: Option<&Path>, ctx: &Context) -> Result<()> {
    let settings = ctx.load_settings(settings_file)?;
    log_warnings(&settings);
    let curve = calculate_curve(&settings)?;
    let lut = curve.to_lut_string();

    match output_file {
        Some(path) => {
            write_atomic(path, &lut)?;
            info!(path = ?path, points = curve.len(), "LUT exported");
            output::print_success(
                &format!("Exported {} points to {}", curve.len(), path.display()),
                ctx.json,
            );
        }
        None if ctx.json => {
            let value = json!({
                "success": true,
                "lut": lut
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        None => println!("{}", lut),
    }
    Ok(())
}
