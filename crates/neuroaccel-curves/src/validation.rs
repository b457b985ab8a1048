//! Field-level parameter checks shared by both curve families.

use crate::error::CurveError;

pub(crate) fn finite(field: &str, value: f64) -> Result<(), CurveError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CurveError::invalid(field, format!("must be finite, got {value}")))
    }
}

pub(crate) fn positive(field: &str, value: f64) -> Result<(), CurveError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(CurveError::invalid(
            field,
            format!("must be > 0, got {value}"),
        ));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: f64) -> Result<(), CurveError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(CurveError::invalid(
            field,
            format!("must be >= 0, got {value}"),
        ));
    }
    Ok(())
}

/// Bases in `(0, 1]` are accepted: 1 degenerates to a linear ramp and smaller
/// bases bend the ramp the other way, but both stay monotone.
pub(crate) fn growth_base(field: &str, value: f64) -> Result<(), CurveError> {
    positive(field, value)
}
