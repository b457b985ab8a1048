//! Writers that hand a sampled sensitivity curve to external accel tools

#![deny(static_mut_refs)]

use anyhow::{Context, Result, anyhow, bail};
use neuroaccel_curves::{CurveSettings, SampledCurve, calculate_curve};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File the exported LUT text is written to.
pub const LUT_FILE_NAME: &str = "neuroaccel_lut.txt";
/// Raw Accel's settings document.
pub const RAW_ACCEL_SETTINGS_FILE_NAME: &str = "settings.json";

const PROFILE_SOURCE: &str = "neuroaccel";
const ACCEL_SECTION: &str = "Whole or horizontal accel parameters";

/// Extra device settings written alongside the curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub profile_name: String,
    pub dpi: f64,
    pub sensitivity: f64,
    pub y_x_ratio: f64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            profile_name: "NeuroAccel".to_string(),
            dpi: 1600.0,
            sensitivity: 1.0,
            y_x_ratio: 1.0,
        }
    }
}

impl DeviceSettings {
    /// Check that every field is usable by the consumer.
    pub fn validate(&self) -> Result<()> {
        if self.profile_name.trim().is_empty() {
            bail!("Profile name cannot be empty");
        }
        for (name, value) in [
            ("dpi", self.dpi),
            ("sensitivity", self.sensitivity),
            ("y_x_ratio", self.y_x_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                bail!("Device {name} must be a positive number, got {value}");
            }
        }
        Ok(())
    }
}

/// Represents a change made to a consumer file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDiff {
    pub file_path: String,
    pub section: Option<String>,
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub operation: DiffOperation,
}

/// Type of configuration operation
///
/// Writers only ever create or overwrite; nothing is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiffOperation {
    /// The target did not exist before
    Add,
    /// The target existed and was overwritten
    Modify,
}

/// Writer trait for putting a sampled curve where a consumer picks it up
pub trait LutWriter {
    /// Write the curve and device settings into `dest_dir`
    fn write_lut(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>>;

    /// Read back what was written and check it matches `curve`
    fn validate_lut(&self, dest_dir: &Path, curve: &SampledCurve) -> Result<bool>;

    /// Diffs `write_lut` would produce, without touching the filesystem
    fn expected_diffs(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>>;
}

/// Factory for constructing LUT writer instances.
pub type LutWriterFactory = fn() -> Box<dyn LutWriter + Send + Sync>;

fn new_raw_accel_writer() -> Box<dyn LutWriter + Send + Sync> {
    Box::new(RawAccelLutWriter)
}

fn new_lut_text_writer() -> Box<dyn LutWriter + Send + Sync> {
    Box::new(LutTextWriter)
}

/// Returns the registry of named LUT writers.
pub fn lut_writer_factories() -> &'static [(&'static str, LutWriterFactory)] {
    &[
        ("raw_accel", new_raw_accel_writer),
        ("lut_text", new_lut_text_writer),
    ]
}

/// Construct the writer registered under `name`.
pub fn lut_writer(name: &str) -> Option<Box<dyn LutWriter + Send + Sync>> {
    lut_writer_factories()
        .iter()
        .find(|(writer_name, _)| *writer_name == name)
        .map(|(_, factory)| factory())
}

/// Calculate the curve for `settings` and hand it to Raw Accel in `dest_dir`.
///
/// Curve warnings are logged, not returned. Nothing is written unless the
/// curve, the device settings and any existing settings document are valid.
pub fn apply_to_raw_accel(
    settings: &CurveSettings,
    dest_dir: &Path,
    device: &DeviceSettings,
) -> Result<Vec<ConfigDiff>> {
    apply_with_writer(&RawAccelLutWriter, settings, dest_dir, device, false)
}

/// Calculate the curve for `settings` and write it with `writer`.
///
/// With `dry_run` the diffs are computed but nothing is written.
pub fn apply_with_writer(
    writer: &dyn LutWriter,
    settings: &CurveSettings,
    dest_dir: &Path,
    device: &DeviceSettings,
    dry_run: bool,
) -> Result<Vec<ConfigDiff>> {
    device.validate()?;
    for warning in settings.warnings() {
        warn!(%warning, "Curve warning");
    }
    let curve = calculate_curve(settings).context("Failed to calculate curve")?;

    if dry_run {
        return writer.expected_diffs(dest_dir, &curve, device);
    }

    let diffs = writer.write_lut(dest_dir, &curve, device)?;
    info!(
        dest = ?dest_dir,
        points = curve.len(),
        changes = diffs.len(),
        "Curve applied"
    );
    Ok(diffs)
}

/// A file write computed up front so that nothing is written when any part
/// of the plan fails.
struct PlannedWrite {
    path: PathBuf,
    content: String,
    diff: ConfigDiff,
}

fn commit(plan: Vec<PlannedWrite>) -> Result<Vec<ConfigDiff>> {
    let mut diffs = Vec::with_capacity(plan.len());
    for write in plan {
        write_atomic(&write.path, &write.content)?;
        diffs.push(write.diff);
    }
    Ok(diffs)
}

/// Plain LUT text writer.
///
/// Writes `neuroaccel_lut.txt` in the export format for tools that import a
/// pasted lookup table.
#[derive(Debug, Default, Clone, Copy)]
pub struct LutTextWriter;

impl LutTextWriter {
    fn plan(&self, dest_dir: &Path, curve: &SampledCurve) -> Result<PlannedWrite> {
        let path = dest_dir.join(LUT_FILE_NAME);
        let existing = read_optional(&path)?;
        let content = curve.to_lut_string();

        let diff = ConfigDiff {
            file_path: path.to_string_lossy().to_string(),
            section: None,
            key: "entire_file".to_string(),
            operation: if existing.is_some() {
                DiffOperation::Modify
            } else {
                DiffOperation::Add
            },
            old_value: existing,
            new_value: content.clone(),
        };
        Ok(PlannedWrite {
            path,
            content,
            diff,
        })
    }
}

impl LutWriter for LutTextWriter {
    fn write_lut(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        _device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>> {
        info!("Writing LUT text");
        commit(vec![self.plan(dest_dir, curve)?])
    }

    fn validate_lut(&self, dest_dir: &Path, curve: &SampledCurve) -> Result<bool> {
        let path = dest_dir.join(LUT_FILE_NAME);
        let Some(content) = read_optional(&path)? else {
            return Ok(false);
        };
        if content.trim() != curve.to_lut_string() {
            debug!(path = ?path, "LUT text differs from curve");
            return Ok(false);
        }
        Ok(SampledCurve::parse_lut(&content).is_ok())
    }

    fn expected_diffs(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        _device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>> {
        Ok(vec![self.plan(dest_dir, curve)?.diff])
    }
}

/// Raw Accel writer.
///
/// Writes the LUT text and upserts a lookup-mode profile named after
/// `DeviceSettings::profile_name` in Raw Accel's `settings.json`, keeping
/// unrelated keys and profiles intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawAccelLutWriter;

impl RawAccelLutWriter {
    fn plan(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        device: &DeviceSettings,
    ) -> Result<Vec<PlannedWrite>> {
        let text = LutTextWriter.plan(dest_dir, curve)?;

        let settings_path = dest_dir.join(RAW_ACCEL_SETTINGS_FILE_NAME);
        let existing = read_optional(&settings_path)?;
        let mut root = match existing.as_deref() {
            Some(content) => parse_settings_object(content)
                .with_context(|| format!("Invalid Raw Accel settings: {:?}", settings_path))?,
            None => Map::new(),
        };

        let profiles = root
            .entry("profiles")
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| anyhow!("'profiles' in {:?} is not an array", settings_path))?;

        let profile = raw_accel_profile(curve, device);
        let position = profiles
            .iter()
            .position(|p| p.get("name").and_then(Value::as_str) == Some(device.profile_name.as_str()));
        let old_profile = position
            .and_then(|i| profiles.get(i))
            .map(serde_json::to_string)
            .transpose()?;

        match position.and_then(|i| profiles.get_mut(i)) {
            Some(slot) => *slot = profile.clone(),
            None => profiles.push(profile.clone()),
        }

        let content = serde_json::to_string_pretty(&Value::Object(root))?;
        let diff = ConfigDiff {
            file_path: settings_path.to_string_lossy().to_string(),
            section: Some("profiles".to_string()),
            key: device.profile_name.clone(),
            operation: if old_profile.is_some() {
                DiffOperation::Modify
            } else {
                DiffOperation::Add
            },
            old_value: old_profile,
            new_value: serde_json::to_string(&profile)?,
        };

        Ok(vec![
            text,
            PlannedWrite {
                path: settings_path,
                content,
                diff,
            },
        ])
    }
}

impl LutWriter for RawAccelLutWriter {
    fn write_lut(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>> {
        info!(profile = %device.profile_name, "Writing Raw Accel lookup profile");
        commit(self.plan(dest_dir, curve, device)?)
    }

    fn validate_lut(&self, dest_dir: &Path, curve: &SampledCurve) -> Result<bool> {
        if !LutTextWriter.validate_lut(dest_dir, curve)? {
            return Ok(false);
        }

        let settings_path = dest_dir.join(RAW_ACCEL_SETTINGS_FILE_NAME);
        let Some(content) = read_optional(&settings_path)? else {
            return Ok(false);
        };
        let root = parse_settings_object(&content)?;
        let expected = lut_data(curve);

        let matches = root
            .get("profiles")
            .and_then(Value::as_array)
            .map(|profiles| {
                profiles.iter().any(|profile| {
                    let ours = profile.get("source").and_then(Value::as_str) == Some(PROFILE_SOURCE);
                    let accel = profile.get(ACCEL_SECTION);
                    let lookup = accel
                        .and_then(|a| a.get("mode"))
                        .and_then(Value::as_str)
                        == Some("lookup");
                    let data = accel
                        .and_then(|a| a.get("data"))
                        .and_then(Value::as_array)
                        .is_some_and(|data| same_data(data, &expected));
                    ours && lookup && data
                })
            })
            .unwrap_or(false);
        Ok(matches)
    }

    fn expected_diffs(
        &self,
        dest_dir: &Path,
        curve: &SampledCurve,
        device: &DeviceSettings,
    ) -> Result<Vec<ConfigDiff>> {
        Ok(self
            .plan(dest_dir, curve, device)?
            .into_iter()
            .map(|write| write.diff)
            .collect())
    }
}

fn raw_accel_profile(curve: &SampledCurve, device: &DeviceSettings) -> Value {
    let mut accel = Map::new();
    accel.insert("mode".to_string(), Value::from("lookup"));
    accel.insert("Gain / Velocity".to_string(), Value::from(false));
    accel.insert("data".to_string(), Value::from(lut_data(curve)));

    let mut profile = Map::new();
    profile.insert("name".to_string(), Value::from(device.profile_name.as_str()));
    profile.insert("source".to_string(), Value::from(PROFILE_SOURCE));
    profile.insert("Output DPI".to_string(), Value::from(device.dpi));
    profile.insert("Y/X output DPI ratio".to_string(), Value::from(device.y_x_ratio));
    profile.insert("Sensitivity multiplier".to_string(), Value::from(device.sensitivity));
    profile.insert(ACCEL_SECTION.to_string(), Value::Object(accel));
    Value::Object(profile)
}

/// Flat `[x0, y0, x1, y1, …]` lookup data, matching the exported text.
fn lut_data(curve: &SampledCurve) -> Vec<f64> {
    curve
        .points()
        .iter()
        .skip(1)
        .flat_map(|p| [p.speed, round4(p.multiplier)])
        .collect()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn same_data(actual: &[Value], expected: &[f64]) -> bool {
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.as_f64().is_some_and(|a| (a - e).abs() < 1e-9))
}

fn parse_settings_object(content: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected a JSON object, found {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file: {:?}", path)),
    }
}

/// Write content to a file atomically: temp file first, then rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    debug!(path = ?path, "Writing file atomically");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write temp file: {:?}", temp_path))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to target: {:?}", path))?;

    Ok(())
}
