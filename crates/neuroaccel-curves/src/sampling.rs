//! Fixed-resolution sampling of curves over speed.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::lut::SampledCurve;

/// One `(speed, multiplier)` sample.
///
/// Serialized as a two-element array `[speed, multiplier]`, which is the shape
/// chart hosts consume directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    /// Input speed in counts/ms.
    pub speed: f64,
    /// Sensitivity multiplier at `speed`.
    pub multiplier: f64,
}

impl SamplePoint {
    /// Create a sample point.
    pub const fn new(speed: f64, multiplier: f64) -> Self {
        Self { speed, multiplier }
    }
}

impl From<(f64, f64)> for SamplePoint {
    fn from((speed, multiplier): (f64, f64)) -> Self {
        Self { speed, multiplier }
    }
}

impl From<SamplePoint> for (f64, f64) {
    fn from(point: SamplePoint) -> Self {
        (point.speed, point.multiplier)
    }
}

impl Serialize for SamplePoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.speed, self.multiplier).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SamplePoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (speed, multiplier) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(SamplePoint { speed, multiplier })
    }
}

/// Sampling resolution and horizon policy.
///
/// The horizon is `max(window_end × headroom, window_end + min_tail)`,
/// extended to the next whole step, so the plateau is always visible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleGrid {
    /// Distance between consecutive samples in counts/ms.
    pub step: f64,
    /// Multiplicative headroom past the end of the acceleration window.
    pub headroom: f64,
    /// Minimum absolute headroom past the end of the window.
    pub min_tail: f64,
    /// Upper bound on the number of samples, including `speed = 0`.
    pub max_points: u32,
}

impl SampleGrid {
    /// The engine's fixed grid: 1 count/ms steps, 25% headroom, at least
    /// 10 counts/ms of plateau.
    pub const DEFAULT: Self = Self {
        step: 1.0,
        headroom: 1.25,
        min_tail: 10.0,
        max_points: 65_536,
    };

    fn validate(&self) -> Result<(), CurveError> {
        crate::validation::positive("grid.step", self.step)?;
        crate::validation::finite("grid.headroom", self.headroom)?;
        if self.headroom < 1.0 {
            return Err(CurveError::invalid(
                "grid.headroom",
                format!("must be >= 1, got {}", self.headroom),
            ));
        }
        crate::validation::non_negative("grid.min_tail", self.min_tail)?;
        if self.max_points < 2 {
            return Err(CurveError::invalid(
                "grid.max_points",
                format!("must be >= 2, got {}", self.max_points),
            ));
        }
        Ok(())
    }

    /// Speed past which sampling stops for a window ending at `window_end`.
    pub fn horizon(&self, window_end: f64) -> f64 {
        (window_end * self.headroom).max(window_end + self.min_tail)
    }

    /// Index of the last sample for a window ending at `window_end`.
    ///
    /// The last sample is the first grid speed at or beyond the horizon, so
    /// at least one sample lies on the plateau.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] if the grid itself is invalid,
    /// or on `field` if covering the window would take more than `max_points`
    /// samples.
    pub fn last_index(&self, field: &str, window_end: f64) -> Result<u32, CurveError> {
        self.validate()?;
        crate::validation::non_negative(field, window_end)?;

        let horizon = self.horizon(window_end);
        let limit = self.max_points - 1;
        let mut last: u32 = 0;
        while f64::from(last) * self.step < horizon {
            if last >= limit {
                return Err(CurveError::invalid(
                    field,
                    format!(
                        "acceleration window ending at {window_end} needs more than {} samples",
                        self.max_points
                    ),
                ));
            }
            last += 1;
        }
        Ok(last)
    }

    /// Grid speeds `0, step, 2·step, …` up to and including `last`.
    ///
    /// Speeds are computed as `i × step` rather than accumulated, so the same
    /// grid always yields bit-identical speeds.
    pub fn speeds(&self, last: u32) -> impl Iterator<Item = f64> + '_ {
        (0..=last).map(move |i| f64::from(i) * self.step)
    }
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sample `f` over `grid` up to the horizon derived from `window_end`.
///
/// The first sample is always at `speed = 0` and the sequence is strictly
/// increasing in speed.
///
/// # Errors
///
/// Returns [`CurveError::InvalidParameter`] on `field` if the grid cannot
/// cover the window; no partial sequence is ever returned.
pub fn sample_fn<F>(
    grid: &SampleGrid,
    field: &str,
    window_end: f64,
    f: F,
) -> Result<SampledCurve, CurveError>
where
    F: Fn(f64) -> f64,
{
    let last = grid.last_index(field, window_end)?;
    let points = grid
        .speeds(last)
        .map(|speed| SamplePoint::new(speed, f(speed)))
        .collect();
    Ok(SampledCurve::from_points_unchecked(points))
}
