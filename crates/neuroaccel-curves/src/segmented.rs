//! Three-segment curve: micro, tracking and flicking ramps chained end to end.
//!
//! Each segment ramps from the previous segment's plateau to its own
//! `max_sens` over its own `range`. The micro segment starts from
//! `common.min_sens` at speed 0, and speeds past the flicking window stay at
//! `flicking.max_sens`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveWarning};
use crate::lut::SampledCurve;
use crate::ramp::{Ramp, is_degenerate_growth};
use crate::sampling::{SampleGrid, SamplePoint, sample_fn};
use crate::validation;

/// Parameters shared by all segments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommonParameters {
    /// Sensor resolution the curve is used at.
    pub dpi: f64,
    /// Multiplier at speed 0; the baseline of the micro segment.
    pub min_sens: f64,
}

/// Ramp parameters of one segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentParameters {
    /// Width of the segment's window in counts/ms.
    pub range: f64,
    /// Exponential base shaping the segment's ramp.
    pub growth_base: f64,
    /// Multiplier at the end of the segment, and baseline of the next one.
    pub max_sens: f64,
}

/// The three speed regimes, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Small, precise movements.
    Micro,
    /// Sustained target tracking.
    Tracking,
    /// Fast flicks.
    Flicking,
}

impl Segment {
    /// All segments in speed order.
    pub const ALL: [Segment; 3] = [Segment::Micro, Segment::Tracking, Segment::Flicking];

    /// Lowercase name, used as the field prefix in errors and settings keys.
    pub fn name(self) -> &'static str {
        match self {
            Segment::Micro => "micro",
            Segment::Tracking => "tracking",
            Segment::Flicking => "flicking",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of the three-segment curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters3 {
    /// Shared parameters.
    pub common: CommonParameters,
    /// First segment, starting at speed 0.
    pub micro: SegmentParameters,
    /// Second segment.
    pub tracking: SegmentParameters,
    /// Last segment; its plateau extends to infinity.
    pub flicking: SegmentParameters,
}

impl Default for CurveParameters3 {
    fn default() -> Self {
        Self {
            common: CommonParameters {
                dpi: 1600.0,
                min_sens: 0.15,
            },
            micro: SegmentParameters {
                range: 20.0,
                growth_base: 1.5,
                max_sens: 0.4,
            },
            tracking: SegmentParameters {
                range: 40.0,
                growth_base: 1.012,
                max_sens: 1.2,
            },
            flicking: SegmentParameters {
                range: 30.0,
                growth_base: 1.023,
                max_sens: 2.5,
            },
        }
    }
}

/// Cumulative speeds at which each segment's window ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentBoundaries {
    /// End of micro, start of tracking.
    pub micro_end: f64,
    /// End of tracking, start of flicking.
    pub tracking_end: f64,
    /// End of flicking; the final plateau starts here.
    pub flicking_end: f64,
}

impl SegmentBoundaries {
    /// Scale every boundary by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            micro_end: self.micro_end * factor,
            tracking_end: self.tracking_end * factor,
            flicking_end: self.flicking_end * factor,
        }
    }
}

impl CurveParameters3 {
    /// Parameters of one segment.
    pub fn segment(&self, segment: Segment) -> &SegmentParameters {
        match segment {
            Segment::Micro => &self.micro,
            Segment::Tracking => &self.tracking,
            Segment::Flicking => &self.flicking,
        }
    }

    /// Mutable parameters of one segment.
    pub fn segment_mut(&mut self, segment: Segment) -> &mut SegmentParameters {
        match segment {
            Segment::Micro => &mut self.micro,
            Segment::Tracking => &mut self.tracking,
            Segment::Flicking => &mut self.flicking,
        }
    }

    /// The chained ramps, in speed order.
    pub fn ramps(&self) -> [Ramp; 3] {
        let micro = Ramp::new(
            0.0,
            self.micro.range,
            self.common.min_sens,
            self.micro.max_sens,
            self.micro.growth_base,
        );
        let tracking = Ramp::new(
            micro.end(),
            self.tracking.range,
            self.micro.max_sens,
            self.tracking.max_sens,
            self.tracking.growth_base,
        );
        let flicking = Ramp::new(
            tracking.end(),
            self.flicking.range,
            self.tracking.max_sens,
            self.flicking.max_sens,
            self.flicking.growth_base,
        );
        [micro, tracking, flicking]
    }

    /// Speeds at which the segments end.
    pub fn boundaries(&self) -> SegmentBoundaries {
        let [micro, tracking, flicking] = self.ramps();
        SegmentBoundaries {
            micro_end: micro.end(),
            tracking_end: tracking.end(),
            flicking_end: flicking.end(),
        }
    }

    /// Sensitivity multiplier at `speed` (counts/ms).
    ///
    /// Continuous across segment boundaries: at `micro_end` the result is
    /// `micro.max_sens`, at `tracking_end` it is `tracking.max_sens`.
    #[inline]
    pub fn evaluate(&self, speed: f64) -> f64 {
        let speed = if speed.is_nan() { 0.0 } else { speed };
        let ramps = self.ramps();
        ramps
            .iter()
            .find(|ramp| speed < ramp.end())
            .map_or(self.flicking.max_sens, |ramp| ramp.evaluate(speed))
    }

    /// Check every field against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] naming the first failing
    /// field as `common.<field>` or `<segment>.<field>`.
    pub fn validate(&self) -> Result<(), CurveError> {
        validation::positive("common.dpi", self.common.dpi)?;
        validation::positive("common.min_sens", self.common.min_sens)?;
        for segment in Segment::ALL {
            let params = self.segment(segment);
            let name = segment.name();
            validation::positive(&format!("{name}.range"), params.range)?;
            validation::growth_base(&format!("{name}.growth_base"), params.growth_base)?;
            validation::positive(&format!("{name}.max_sens"), params.max_sens)?;
        }
        Ok(())
    }

    /// Non-fatal findings about these parameters.
    pub fn warnings(&self) -> Vec<CurveWarning> {
        let mut warnings = Vec::new();
        let mut baseline = self.common.min_sens;
        for segment in Segment::ALL {
            let params = self.segment(segment);
            let name = segment.name();
            if params.max_sens < baseline {
                warnings.push(CurveWarning::InvertedRamp {
                    field: format!("{name}.max_sens"),
                });
            }
            if is_degenerate_growth(params.growth_base) {
                warnings.push(CurveWarning::DegenerateGrowth {
                    field: format!("{name}.growth_base"),
                });
            }
            baseline = params.max_sens;
        }
        warnings
    }

    /// Sample the curve on the engine's fixed grid.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] if validation fails.
    pub fn sample(&self) -> Result<SegmentedCurve, CurveError> {
        self.sample_with(&SampleGrid::DEFAULT)
    }

    /// Sample the curve on a custom grid.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] if validation fails or the
    /// grid cannot cover the three windows.
    pub fn sample_with(&self, grid: &SampleGrid) -> Result<SegmentedCurve, CurveError> {
        self.validate()?;
        let boundaries = self.boundaries();
        grid.last_index("micro.range", boundaries.micro_end)?;
        grid.last_index("tracking.range", boundaries.tracking_end)?;
        let curve = sample_fn(grid, "flicking.range", boundaries.flicking_end, |speed| {
            self.evaluate(speed)
        })?;
        Ok(SegmentedCurve { curve, boundaries })
    }
}

/// A sampled three-segment curve together with its segment boundaries.
///
/// Hosts that colour segments differently use [`SegmentedCurve::segments`] to
/// split the samples; neighbouring slices share their boundary sample so the
/// drawn curve has no gaps.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentedCurve {
    curve: SampledCurve,
    boundaries: SegmentBoundaries,
}

impl SegmentedCurve {
    /// All samples.
    pub fn curve(&self) -> &SampledCurve {
        &self.curve
    }

    /// Consume into the plain sampled curve.
    pub fn into_curve(self) -> SampledCurve {
        self.curve
    }

    /// Segment end speeds, in the same units as the samples.
    pub fn boundaries(&self) -> &SegmentBoundaries {
        &self.boundaries
    }

    /// Number of samples at or below `micro_end` and `tracking_end`.
    ///
    /// These are the split indices: `points[..micro]` lies in the micro
    /// segment and `points[..tracking]` in micro or tracking.
    pub fn boundary_indices(&self) -> (usize, usize) {
        let points = self.curve.points();
        let micro = points.partition_point(|p| p.speed <= self.boundaries.micro_end);
        let tracking = points.partition_point(|p| p.speed <= self.boundaries.tracking_end);
        (micro, tracking)
    }

    /// Samples belonging to one segment, including the shared boundary sample
    /// with the previous segment.
    pub fn segment(&self, segment: Segment) -> &[SamplePoint] {
        let points = self.curve.points();
        let (micro, tracking) = self.boundary_indices();
        let range = match segment {
            Segment::Micro => 0..micro,
            Segment::Tracking => micro.saturating_sub(1)..tracking,
            Segment::Flicking => tracking.saturating_sub(1)..points.len(),
        };
        points.get(range).unwrap_or(&[])
    }

    /// All three segments, in speed order.
    pub fn segments(&self) -> [(Segment, &[SamplePoint]); 3] {
        Segment::ALL.map(|segment| (segment, self.segment(segment)))
    }

    /// Scale samples and boundaries by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] on field `dpi` under the same
    /// conditions as [`SampledCurve::scaled`].
    pub fn scaled(&self, factor: f64) -> Result<Self, CurveError> {
        Ok(Self {
            curve: self.curve.scaled(factor)?,
            boundaries: self.boundaries.scaled(factor),
        })
    }
}
