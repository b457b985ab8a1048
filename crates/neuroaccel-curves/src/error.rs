//! Error and warning types for curve operations.

use std::fmt;

/// Error type for curve operations.
///
/// Every failure the engine can report is a validation failure: evaluation is
/// pure, so there is nothing transient to retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// A supplied parameter is non-finite or outside its domain.
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// Dotted field path, e.g. `range` or `tracking.growth_base`.
        field: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An exported LUT text could not be parsed back into a curve.
    #[error("Malformed LUT entry {entry}: {reason}")]
    MalformedLut {
        /// 1-based index of the offending `x,y` entry.
        entry: usize,
        /// Human-readable reason.
        reason: String,
    },
}

impl CurveError {
    /// Create an invalid parameter error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CurveError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The field that failed validation, if this is a parameter error.
    pub fn field(&self) -> Option<&str> {
        match self {
            CurveError::InvalidParameter { field, .. } => Some(field),
            CurveError::MalformedLut { .. } => None,
        }
    }
}

/// Non-fatal diagnosis of a parameter set.
///
/// Warnings never block evaluation; hosts decide whether to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveWarning {
    /// The ramp ends lower than it starts, so the curve decreases with speed.
    InvertedRamp {
        /// The `max_sens` field that is below its baseline.
        field: String,
    },
    /// The growth base is indistinguishable from 1; the ramp is linear.
    DegenerateGrowth {
        /// The `growth_base` field.
        field: String,
    },
}

impl CurveWarning {
    /// The field the warning refers to.
    pub fn field(&self) -> &str {
        match self {
            CurveWarning::InvertedRamp { field } | CurveWarning::DegenerateGrowth { field } => {
                field
            }
        }
    }
}

impl fmt::Display for CurveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveWarning::InvertedRamp { field } => {
                write!(f, "{field} is below its baseline; the curve decreases with speed")
            }
            CurveWarning::DegenerateGrowth { field } => {
                write!(f, "{field} is effectively 1; the ramp is linear")
            }
        }
    }
}
