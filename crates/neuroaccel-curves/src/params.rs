//! Single-segment curve: an offset, one exponential ramp, and a plateau.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveWarning};
use crate::lut::SampledCurve;
use crate::ramp::{Ramp, is_degenerate_growth};
use crate::sampling::{SampleGrid, sample_fn};
use crate::validation;

/// Parameters of the single-segment sensitivity curve.
///
/// The multiplier is `min_sens` up to `offset`, ramps to `max_sens` over
/// `range` counts/ms with steepness `growth_base`, and stays at `max_sens`
/// afterwards.
///
/// # Example
///
/// ```
/// use neuroaccel_curves::CurveParameters;
///
/// let params = CurveParameters {
///     min_sens: 1.0,
///     max_sens: 2.0,
///     offset: 0.0,
///     range: 50.0,
///     growth_base: 1.05,
/// };
///
/// assert_eq!(params.evaluate(0.0), 1.0);
/// assert_eq!(params.evaluate(50.0), 2.0);
/// let mid = params.evaluate(25.0);
/// assert!(mid > 1.0 && mid < 1.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters {
    /// Multiplier at and below `offset`.
    pub min_sens: f64,
    /// Multiplier at and above `offset + range`.
    pub max_sens: f64,
    /// Speed below which no acceleration happens.
    pub offset: f64,
    /// Width of the acceleration window.
    pub range: f64,
    /// Exponential base shaping the ramp.
    pub growth_base: f64,
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            min_sens: 1.0,
            max_sens: 2.0,
            offset: 0.0,
            range: 64.0,
            growth_base: 1.05,
        }
    }
}

impl CurveParameters {
    /// The acceleration ramp described by these parameters.
    pub fn ramp(&self) -> Ramp {
        Ramp::new(
            self.offset,
            self.range,
            self.min_sens,
            self.max_sens,
            self.growth_base,
        )
    }

    /// Speed at which the plateau starts (`offset + range`).
    pub fn window_end(&self) -> f64 {
        self.offset + self.range
    }

    /// Sensitivity multiplier at `speed` (counts/ms).
    ///
    /// Total: never panics, and returns a finite value whenever the
    /// multipliers themselves are finite. A non-positive `range` is treated
    /// as `f64::EPSILON`.
    #[inline]
    pub fn evaluate(&self, speed: f64) -> f64 {
        self.ramp().evaluate(speed)
    }

    /// Check every field against its domain.
    ///
    /// `max_sens < min_sens` is accepted; see [`CurveParameters::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] naming the first failing field.
    pub fn validate(&self) -> Result<(), CurveError> {
        validation::positive("min_sens", self.min_sens)?;
        validation::positive("max_sens", self.max_sens)?;
        validation::non_negative("offset", self.offset)?;
        validation::positive("range", self.range)?;
        validation::growth_base("growth_base", self.growth_base)?;
        Ok(())
    }

    /// Non-fatal findings about these parameters.
    pub fn warnings(&self) -> Vec<CurveWarning> {
        let mut warnings = Vec::new();
        if self.max_sens < self.min_sens {
            warnings.push(CurveWarning::InvertedRamp {
                field: "max_sens".to_string(),
            });
        }
        if is_degenerate_growth(self.growth_base) {
            warnings.push(CurveWarning::DegenerateGrowth {
                field: "growth_base".to_string(),
            });
        }
        warnings
    }

    /// Sample the curve on the engine's fixed grid.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] if validation fails.
    pub fn sample(&self) -> Result<SampledCurve, CurveError> {
        self.sample_with(&SampleGrid::DEFAULT)
    }

    /// Sample the curve on a custom grid.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] if validation fails or the
    /// grid cannot cover the window. The error names `offset` when the offset
    /// alone is out of the grid's reach, otherwise `range`.
    pub fn sample_with(&self, grid: &SampleGrid) -> Result<SampledCurve, CurveError> {
        self.validate()?;
        grid.last_index("offset", self.offset)?;
        let ramp = self.ramp();
        sample_fn(grid, "range", self.window_end(), |speed| ramp.evaluate(speed))
    }
}
