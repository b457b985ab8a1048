//! Commonly used types and operations.
//!
//! ```
//! use neuroaccel_curves::prelude::*;
//!
//! let curve = calculate_curve(&get_default_settings(CurveVariant::Segmented))?;
//! assert!(curve.is_monotonic());
//! # Ok::<(), CurveError>(())
//! ```

pub use crate::descriptor::{ParameterDescriptor, ParameterGroup};
pub use crate::engine::{
    REFERENCE_DPI, calculate_curve, calculate_segmented_curve, get_all_default_settings,
    get_default_settings,
};
pub use crate::error::{CurveError, CurveWarning};
pub use crate::lut::SampledCurve;
pub use crate::params::CurveParameters;
pub use crate::sampling::{SampleGrid, SamplePoint};
pub use crate::segmented::{
    CommonParameters, CurveParameters3, Segment, SegmentBoundaries, SegmentParameters,
    SegmentedCurve,
};
pub use crate::settings::{CurveSettings, CurveVariant};
