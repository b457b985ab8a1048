//! Sensitivity curve engine for NeuroAccel
//!
//! This crate maps raw pointer speed (counts/ms) to a sensitivity multiplier
//! and samples the resulting transfer curve for hosts and external accel
//! tools.
//!
//! # Overview
//!
//! Two curve families are supported:
//! - **Single**: flat at `min_sens` up to an offset, one exponential ramp to
//!   `max_sens`, flat afterwards
//! - **Segmented**: micro, tracking and flicking ramps chained end to end,
//!   each starting from the previous plateau
//!
//! Both share the normalized ramp `(b^t - 1) / (b - 1)` from [`ramp`], which
//! degenerates to a straight line as the growth base approaches 1.
//!
//! # Evaluation vs. sampling
//!
//! `evaluate` is total: it never panics and treats a non-positive range as
//! `f64::EPSILON`. Sampling (`sample`, [`calculate_curve`]) validates first
//! and either returns a complete [`SampledCurve`] or a [`CurveError`]. Both
//! are pure and deterministic; identical parameters give bit-identical
//! samples.
//!
//! # Example
//!
//! ```
//! use neuroaccel_curves::{CurveVariant, calculate_curve, get_default_settings};
//!
//! let settings = get_default_settings(CurveVariant::Single);
//! let curve = calculate_curve(&settings)?;
//!
//! assert_eq!(curve.points().first().map(|p| p.speed), Some(0.0));
//! assert!(curve.is_monotonic());
//!
//! // Text form for external accel tools
//! let lut = curve.to_lut_string();
//! assert!(lut.starts_with("1,"));
//! # Ok::<(), neuroaccel_curves::CurveError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod lut;
pub mod params;
pub mod prelude;
pub mod ramp;
pub mod sampling;
pub mod segmented;
pub mod settings;

mod validation;

pub use descriptor::{ParameterDescriptor, ParameterGroup};
pub use engine::{
    REFERENCE_DPI, calculate_curve, calculate_curve_with, calculate_segmented_curve,
    default_parameters, default_parameters3, evaluate, evaluate3, get_all_default_settings,
    get_default_settings, sample_curve, sample_curve3, sample_curve_with,
};
pub use error::{CurveError, CurveWarning};
pub use lut::{LUT_SEPARATOR, SampledCurve};
pub use params::CurveParameters;
pub use ramp::Ramp;
pub use sampling::{SampleGrid, SamplePoint, sample_fn};
pub use segmented::{
    CommonParameters, CurveParameters3, Segment, SegmentBoundaries, SegmentParameters,
    SegmentedCurve,
};
pub use settings::{CurveSettings, CurveVariant};
