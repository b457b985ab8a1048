//! Output formatting for CLI responses

use anyhow::Error;
use colored::*;
use neuroaccel_curves::{
    CurveSettings, CurveWarning, ParameterGroup, SampledCurve, SamplePoint, SegmentedCurve,
};
use neuroaccel_settings::to_flat_map;
use neuroaccel_writers::{ConfigDiff, DiffOperation};
use serde_json::{Value, json};
use std::path::Path;

use crate::error::exit_code;

fn emit(value: &Value, what: &str) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format {} as JSON: {}", what, e),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": error_type_name(error),
            "causes": error.chain().skip(1).map(|c| c.to_string()).collect::<Vec<_>>(),
        }
    });
    emit(&error_json, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

fn error_type_name(error: &Error) -> &'static str {
    match exit_code(error) {
        3 => "not_found",
        4 => "invalid",
        5 => "io",
        _ => "error",
    }
}

/// Print success message
pub fn print_success(message: &str, json: bool) {
    if json {
        emit(
            &json!({
                "success": true,
                "message": message
            }),
            "success message",
        );
    } else {
        println!("{} {}", "✓".green(), message);
    }
}

fn warning_strings(warnings: &[CurveWarning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

fn points_json(points: &[SamplePoint]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.speed, p.multiplier]).collect()
}

/// Print settings as a JSON object or a flat key listing
pub fn print_settings(settings: &CurveSettings, path: Option<&Path>, json: bool) {
    if json {
        emit(
            &json!({
                "success": true,
                "path": path.map(|p| p.display().to_string()),
                "variant": settings.variant(),
                "settings": settings,
                "warnings": warning_strings(&settings.warnings()),
            }),
            "settings",
        );
        return;
    }

    if let Some(path) = path {
        println!("{} {}", "Settings:".bold(), path.display().to_string().dimmed());
    }
    println!("  {} {}", "Variant:".bold(), settings.variant().to_string().cyan());
    for (key, value) in to_flat_map(settings) {
        println!("  {:<22} {}", key, value);
    }
}

/// Print parameter descriptor groups
pub fn print_parameter_groups(groups: &[ParameterGroup], json: bool) {
    if json {
        emit(
            &json!({
                "success": true,
                "groups": groups
            }),
            "parameter groups",
        );
        return;
    }

    for group in groups {
        println!("{}", group.name.bold());
        for p in &group.parameters {
            println!(
                "  {:<22} {:<8} default {:<8} range [{}, {}] step {}",
                p.key.cyan(),
                p.label,
                p.default,
                p.min,
                p.max,
                p.step
            );
            println!("  {:<22} {}", "", p.tooltip.dimmed());
        }
    }
}

fn print_points(points: &[SamplePoint]) {
    let rows: Vec<Vec<String>> = points
        .iter()
        .map(|p| vec![format!("{:.2}", p.speed), format!("{:.4}", p.multiplier)])
        .collect();
    print_table(&["speed", "multiplier"], &rows);
}

/// Print a sampled curve
pub fn print_curve(curve: &SampledCurve, warnings: &[CurveWarning], json: bool) {
    if json {
        emit(
            &json!({
                "success": true,
                "points": points_json(curve.points()),
                "warnings": warning_strings(warnings),
            }),
            "curve",
        );
        return;
    }

    println!(
        "{} {} points, multiplier {:.4} to {:.4}",
        "Curve:".bold(),
        curve.len(),
        curve.min_multiplier(),
        curve.max_multiplier()
    );
    print_points(curve.points());
}

/// Print a three-segment curve split at its boundaries
pub fn print_segmented_curve(curve: &SegmentedCurve, warnings: &[CurveWarning], json: bool) {
    if json {
        let segments: serde_json::Map<String, Value> = curve
            .segments()
            .iter()
            .map(|(segment, points)| (segment.name().to_string(), json!(points_json(points))))
            .collect();
        emit(
            &json!({
                "success": true,
                "boundaries": curve.boundaries(),
                "segments": segments,
                "warnings": warning_strings(warnings),
            }),
            "segmented curve",
        );
        return;
    }

    let bounds = curve.boundaries();
    println!(
        "{} micro ends at {:.2}, tracking at {:.2}, flicking at {:.2}",
        "Boundaries:".bold(),
        bounds.micro_end,
        bounds.tracking_end,
        bounds.flicking_end
    );
    for (segment, points) in curve.segments() {
        println!("{} ({} points)", segment.name().bold(), points.len());
        print_points(points);
    }
}

/// Print the changes a writer made or would make
pub fn print_diffs(diffs: &[ConfigDiff], dry_run: bool, json: bool) {
    if json {
        emit(
            &json!({
                "success": true,
                "dry_run": dry_run,
                "changes": diffs
            }),
            "changes",
        );
        return;
    }

    if dry_run {
        println!("{}", "Dry run, nothing written".yellow());
    }
    if diffs.is_empty() {
        println!("{}", "No changes".yellow());
        return;
    }
    for diff in diffs {
        let marker = match diff.operation {
            DiffOperation::Add => "+".green(),
            DiffOperation::Modify => "~".yellow(),
        };
        match &diff.section {
            Some(section) => println!("  {} {} [{}] {}", marker, diff.file_path, section, diff.key),
            None => println!("  {} {} {}", marker, diff.file_path, diff.key),
        }
    }
}

/// Print rows under bold headers
fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("{}", "No data".yellow());
        return;
    }

    let header_line: Vec<String> = headers
        .iter()
        .map(|h| format!("{:>10}", h).bold().to_string())
        .collect();
    println!("  {}", header_line.join("  "));

    for row in rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>10}", v)).collect();
        println!("  {}", cells.join("  "));
    }
}
