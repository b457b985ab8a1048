//! Host-facing operations: defaults, curve calculation and descriptors.
//!
//! Everything here is pure and synchronous. Hosts call these on every edit;
//! the default curves are sampled in well under a millisecond.

use crate::descriptor::{ParameterDescriptor, ParameterGroup};
use crate::error::CurveError;
use crate::lut::SampledCurve;
use crate::params::CurveParameters;
use crate::sampling::SampleGrid;
use crate::segmented::{CurveParameters3, Segment, SegmentParameters, SegmentedCurve};
use crate::settings::{CurveSettings, CurveVariant};

/// Resolution curves are authored at. Sampled curves are scaled by
/// `dpi / REFERENCE_DPI` on both axes.
pub const REFERENCE_DPI: f64 = 1600.0;

/// Default settings of a curve variant.
pub fn get_default_settings(variant: CurveVariant) -> CurveSettings {
    CurveSettings::defaults(variant)
}

/// Sample the curve described by `settings`, scaled to its dpi.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if any parameter is outside its
/// domain, or on field `dpi` if scaling to the dpi overflows or underflows.
/// No partial curve is returned.
pub fn calculate_curve(settings: &CurveSettings) -> Result<SampledCurve, CurveError> {
    calculate_curve_with(settings, &SampleGrid::DEFAULT)
}

/// [`calculate_curve`] on a custom sampling grid.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if a parameter or the grid is
/// invalid.
pub fn calculate_curve_with(
    settings: &CurveSettings,
    grid: &SampleGrid,
) -> Result<SampledCurve, CurveError> {
    settings.validate()?;
    let curve = match settings {
        CurveSettings::Single { params, .. } => params.sample_with(grid)?,
        CurveSettings::Segmented(params) => params.sample_with(grid)?.into_curve(),
    };
    curve.scaled(settings.dpi_scale())
}

/// Sample a three-segment curve with its boundaries, scaled to `common.dpi`.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if any parameter is invalid, or on
/// field `dpi` if the scaled curve would overflow or underflow.
pub fn calculate_segmented_curve(params: &CurveParameters3) -> Result<SegmentedCurve, CurveError> {
    params.sample()?.scaled(params.common.dpi / REFERENCE_DPI)
}

/// Parameter descriptors for a variant, grouped for display.
pub fn get_all_default_settings(variant: CurveVariant) -> Vec<ParameterGroup> {
    match variant {
        CurveVariant::Single => single_groups(),
        CurveVariant::Segmented => segmented_groups(),
    }
}

/// Default single-segment parameters.
pub fn default_parameters() -> CurveParameters {
    CurveParameters::default()
}

/// Default three-segment parameters.
pub fn default_parameters3() -> CurveParameters3 {
    CurveParameters3::default()
}

/// Single-segment multiplier at `speed`.
pub fn evaluate(params: &CurveParameters, speed: f64) -> f64 {
    params.evaluate(speed)
}

/// Three-segment multiplier at `speed`.
pub fn evaluate3(params: &CurveParameters3, speed: f64) -> f64 {
    params.evaluate(speed)
}

/// Sample a single-segment curve at the reference dpi.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if any parameter is invalid.
pub fn sample_curve(params: &CurveParameters) -> Result<SampledCurve, CurveError> {
    params.sample()
}

/// [`sample_curve`] on a custom grid.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if a parameter or the grid is
/// invalid.
pub fn sample_curve_with(
    params: &CurveParameters,
    grid: &SampleGrid,
) -> Result<SampledCurve, CurveError> {
    params.sample_with(grid)
}

/// Sample a three-segment curve at the reference dpi.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] if any parameter is invalid.
pub fn sample_curve3(params: &CurveParameters3) -> Result<SegmentedCurve, CurveError> {
    params.sample()
}

const DPI_TOOLTIP: &str = "Sensor resolution the curve is used at";
const GROWTH_TOOLTIP: &str = "How quickly sensitivity increases within the range";

fn dpi_descriptor(default: f64) -> ParameterDescriptor {
    ParameterDescriptor {
        key: "dpi",
        label: "DPI",
        tooltip: DPI_TOOLTIP,
        min: 400.0,
        max: 6400.0,
        step: 100.0,
        default,
    }
}

fn single_groups() -> Vec<ParameterGroup> {
    let defaults = CurveParameters::default();
    vec![ParameterGroup {
        name: "curve",
        parameters: vec![
            dpi_descriptor(REFERENCE_DPI),
            ParameterDescriptor {
                key: "min_sens",
                label: "Min",
                tooltip: "Sensitivity multiplier below the offset",
                min: 0.1,
                max: 2.0,
                step: 0.1,
                default: defaults.min_sens,
            },
            ParameterDescriptor {
                key: "max_sens",
                label: "Max",
                tooltip: "Sensitivity multiplier past the end of the range",
                min: 1.0,
                max: 10.0,
                step: 0.1,
                default: defaults.max_sens,
            },
            ParameterDescriptor {
                key: "offset",
                label: "Offset",
                tooltip: "Speed (in counts/ms) below which no acceleration is applied",
                min: 0.0,
                max: 100.0,
                step: 1.0,
                default: defaults.offset,
            },
            ParameterDescriptor {
                key: "range",
                label: "Range",
                tooltip: "Speed range (in counts/ms) over which sensitivity increases",
                min: 1.0,
                max: 200.0,
                step: 1.0,
                default: defaults.range,
            },
            ParameterDescriptor {
                key: "growth_base",
                label: "Growth",
                tooltip: GROWTH_TOOLTIP,
                min: 1.001,
                max: 1.5,
                step: 0.001,
                default: defaults.growth_base,
            },
        ],
    }]
}

fn segment_group(segment: Segment, defaults: &SegmentParameters) -> ParameterGroup {
    let (range_key, growth_key, max_key, range_tooltip, max_limit) = match segment {
        Segment::Micro => (
            "micro_range",
            "micro_growth_base",
            "micro_max_sens",
            "Speed range (in counts/ms) of small, precise movements",
            5.0,
        ),
        Segment::Tracking => (
            "tracking_range",
            "tracking_growth_base",
            "tracking_max_sens",
            "Speed range (in counts/ms) of sustained target tracking",
            10.0,
        ),
        Segment::Flicking => (
            "flicking_range",
            "flicking_growth_base",
            "flicking_max_sens",
            "Speed range (in counts/ms) of fast flicks",
            10.0,
        ),
    };

    ParameterGroup {
        name: segment.name(),
        parameters: vec![
            ParameterDescriptor {
                key: range_key,
                label: "Range",
                tooltip: range_tooltip,
                min: 1.0,
                max: 100.0,
                step: 1.0,
                default: defaults.range,
            },
            ParameterDescriptor {
                key: growth_key,
                label: "Growth",
                tooltip: GROWTH_TOOLTIP,
                min: 1.001,
                max: 1.5,
                step: 0.001,
                default: defaults.growth_base,
            },
            ParameterDescriptor {
                key: max_key,
                label: "Max",
                tooltip: "Sensitivity multiplier reached at the end of this segment",
                min: 0.1,
                max: max_limit,
                step: 0.1,
                default: defaults.max_sens,
            },
        ],
    }
}

fn segmented_groups() -> Vec<ParameterGroup> {
    let defaults = CurveParameters3::default();
    let mut groups = vec![ParameterGroup {
        name: "common",
        parameters: vec![
            dpi_descriptor(defaults.common.dpi),
            ParameterDescriptor {
                key: "min_sens",
                label: "Min",
                tooltip: "Sensitivity multiplier at rest, where the micro segment starts",
                min: 0.01,
                max: 1.0,
                step: 0.01,
                default: defaults.common.min_sens,
            },
        ],
    }];
    groups.extend(
        Segment::ALL
            .iter()
            .map(|&segment| segment_group(segment, defaults.segment(segment))),
    );
    groups
}
