//! Sampled curves and the LUT text format consumed by external accel tools.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;
use crate::sampling::SamplePoint;

/// Separator between entries of an exported LUT.
pub const LUT_SEPARATOR: &str = ";\n";

/// An ordered, fully materialized sequence of curve samples.
///
/// Invariants, upheld by every constructor:
/// - at least one point
/// - the first point has `speed = 0`
/// - speeds are finite and strictly increasing
///
/// # Example
///
/// ```
/// use neuroaccel_curves::{SampledCurve, SamplePoint};
///
/// let curve = SampledCurve::from_points(vec![
///     SamplePoint::new(0.0, 1.0),
///     SamplePoint::new(1.0, 1.02),
///     SamplePoint::new(2.0, 1.05),
/// ])?;
///
/// assert_eq!(curve.to_lut_string(), "1,1.0200;\n2,1.0500");
/// assert!((curve.lookup(1.5) - 1.035).abs() < 1e-9);
/// # Ok::<(), neuroaccel_curves::CurveError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SampledCurve {
    points: Vec<SamplePoint>,
}

impl SampledCurve {
    /// Build a curve from points, checking the ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] on field `points` if the
    /// sequence is empty, does not start at speed 0, is not strictly
    /// increasing, or contains non-finite values.
    pub fn from_points(points: Vec<SamplePoint>) -> Result<Self, CurveError> {
        let Some(first) = points.first() else {
            return Err(CurveError::invalid("points", "curve must have at least one point"));
        };
        if first.speed.abs() > 0.0 {
            return Err(CurveError::invalid(
                "points",
                format!("first point must be at speed 0, got {}", first.speed),
            ));
        }
        if let Some(bad) = points
            .iter()
            .position(|p| !p.speed.is_finite() || !p.multiplier.is_finite())
        {
            return Err(CurveError::invalid(
                "points",
                format!("point {bad} is not finite"),
            ));
        }
        if let Some(bad) = points.windows(2).position(|w| match w {
            [a, b] => b.speed <= a.speed,
            _ => false,
        }) {
            return Err(CurveError::invalid(
                "points",
                format!("speeds must be strictly increasing (at point {})", bad + 1),
            ));
        }
        Ok(Self { points })
    }

    /// Construct without checks; callers guarantee the invariants.
    pub(crate) fn from_points_unchecked(points: Vec<SamplePoint>) -> Self {
        Self { points }
    }

    /// The samples, ordered by speed.
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Consume the curve, returning its samples.
    pub fn into_points(self) -> Vec<SamplePoint> {
        self.points
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Last sample, which lies on the final plateau for engine-built curves.
    pub fn last(&self) -> Option<&SamplePoint> {
        self.points.last()
    }

    /// Iterator over sample speeds.
    pub fn speeds(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.speed)
    }

    /// Iterator over sample multipliers.
    pub fn multipliers(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.multiplier)
    }

    /// Interpolated multiplier at `speed`.
    ///
    /// Linear interpolation between neighbouring samples; speeds outside the
    /// sampled range take the nearest end value. NaN is treated as 0.
    #[inline]
    pub fn lookup(&self, speed: f64) -> f64 {
        let speed = if speed.is_nan() { 0.0 } else { speed };
        let upper = self.points.partition_point(|p| p.speed <= speed);

        let low = upper.checked_sub(1).and_then(|i| self.points.get(i));
        let high = self.points.get(upper);

        match (low, high) {
            (Some(low), Some(high)) => {
                let fraction = (speed - low.speed) / (high.speed - low.speed);
                low.multiplier + fraction * (high.multiplier - low.multiplier)
            }
            (Some(only), None) | (None, Some(only)) => only.multiplier,
            (None, None) => 0.0,
        }
    }

    /// Whether multipliers never decrease with speed.
    pub fn is_monotonic(&self) -> bool {
        self.points.windows(2).all(|w| match w {
            [a, b] => b.multiplier >= a.multiplier,
            _ => true,
        })
    }

    /// Smallest multiplier in the curve.
    pub fn min_multiplier(&self) -> f64 {
        self.multipliers().fold(f64::INFINITY, f64::min)
    }

    /// Largest multiplier in the curve.
    pub fn max_multiplier(&self) -> f64 {
        self.multipliers().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Scale both axes by `factor`, the ratio of the target dpi to the
    /// reference dpi.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] on field `dpi` if `factor` is
    /// not a positive normal number, or if scaling overflows a sample or
    /// collapses two speeds onto each other.
    pub fn scaled(&self, factor: f64) -> Result<Self, CurveError> {
        if !(factor.is_normal() && factor > 0.0) {
            return Err(CurveError::invalid(
                "dpi",
                format!("dpi scale factor must be a positive normal number, got {factor}"),
            ));
        }
        let points = self
            .points
            .iter()
            .map(|p| SamplePoint::new(p.speed * factor, p.multiplier * factor))
            .collect();
        Self::from_points(points).map_err(|e| {
            CurveError::invalid("dpi", format!("scaling by {factor} breaks the curve: {e}"))
        })
    }

    /// Render the curve in LUT text form.
    ///
    /// Every point except the first (`speed = 0`, implied by consumers) is
    /// written as `speed,multiplier` with exactly four decimals on the
    /// multiplier, and entries are joined by `";\n"`.
    pub fn to_lut_string(&self) -> String {
        self.points
            .iter()
            .skip(1)
            .map(|p| format!("{},{:.4}", p.speed, p.multiplier))
            .collect::<Vec<_>>()
            .join(LUT_SEPARATOR)
    }

    /// Parse LUT text produced by [`SampledCurve::to_lut_string`].
    ///
    /// Entries are separated by `;` with optional surrounding whitespace. The
    /// implied `speed = 0` point is restored with the first entry's
    /// multiplier.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::MalformedLut`] for entries that are not two
    /// numbers, and [`CurveError::InvalidParameter`] if the parsed points
    /// break the ordering invariants.
    pub fn parse_lut(text: &str) -> Result<Self, CurveError> {
        let mut points = Vec::new();

        for (index, entry) in text
            .split(';')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .enumerate()
        {
            let entry_no = index + 1;
            let (x, y) = entry.split_once(',').ok_or_else(|| CurveError::MalformedLut {
                entry: entry_no,
                reason: format!("expected 'speed,multiplier', got '{entry}'"),
            })?;
            let speed = parse_number(entry_no, x)?;
            let multiplier = parse_number(entry_no, y)?;
            points.push(SamplePoint::new(speed, multiplier));
        }

        let Some(first) = points.first().copied() else {
            return Err(CurveError::MalformedLut {
                entry: 0,
                reason: "LUT is empty".to_string(),
            });
        };
        if first.speed > 0.0 {
            points.insert(0, SamplePoint::new(0.0, first.multiplier));
        }

        Self::from_points(points)
    }
}

fn parse_number(entry: usize, text: &str) -> Result<f64, CurveError> {
    text.trim()
        .parse::<f64>()
        .map_err(|e| CurveError::MalformedLut {
            entry,
            reason: format!("'{}' is not a number: {e}", text.trim()),
        })
}

impl<'a> IntoIterator for &'a SampledCurve {
    type Item = &'a SamplePoint;
    type IntoIter = std::slice::Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Serialize for SampledCurve {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.points.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SampledCurve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points: Vec<SamplePoint> = Vec::deserialize(deserializer)?;
        SampledCurve::from_points(points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn must<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("unexpected error: {:?}", e),
        }
    }

    fn three_points() -> SampledCurve {
        must(SampledCurve::from_points(vec![
            SamplePoint::new(0.0, 1.0),
            SamplePoint::new(1.0, 1.02),
            SamplePoint::new(2.0, 1.05),
        ]))
    }

    #[test]
    fn test_export_format() {
        assert_eq!(three_points().to_lut_string(), "1,1.0200;\n2,1.0500");
    }

    #[test]
    fn test_export_single_point_is_empty() {
        let curve = must(SampledCurve::from_points(vec![SamplePoint::new(0.0, 1.0)]));
        assert_eq!(curve.to_lut_string(), "");
    }

    #[test]
    fn test_export_fractional_speeds() {
        let curve = must(SampledCurve::from_points(vec![
            SamplePoint::new(0.0, 0.5),
            SamplePoint::new(0.5, 0.75),
        ]));
        assert_eq!(curve.to_lut_string(), "0.5,0.7500");
    }

    #[test]
    fn test_from_points_rejects_bad_sequences() {
        assert!(SampledCurve::from_points(vec![]).is_err());
        assert!(SampledCurve::from_points(vec![SamplePoint::new(1.0, 1.0)]).is_err());
        assert!(
            SampledCurve::from_points(vec![
                SamplePoint::new(0.0, 1.0),
                SamplePoint::new(0.0, 1.1),
            ])
            .is_err()
        );
        assert!(
            SampledCurve::from_points(vec![
                SamplePoint::new(0.0, 1.0),
                SamplePoint::new(1.0, f64::NAN),
            ])
            .is_err()
        );
    }

    #[test]
    fn test_lookup_interpolates_and_clamps() {
        let curve = three_points();
        assert_relative_eq!(curve.lookup(0.0), 1.0);
        assert_relative_eq!(curve.lookup(0.5), 1.01, epsilon = 1e-12);
        assert_relative_eq!(curve.lookup(2.0), 1.05);
        assert_relative_eq!(curve.lookup(100.0), 1.05);
        assert_relative_eq!(curve.lookup(-3.0), 1.0);
        assert_relative_eq!(curve.lookup(f64::NAN), 1.0);
    }

    #[test]
    fn test_monotonic_and_extrema() {
        let curve = three_points();
        assert!(curve.is_monotonic());
        assert_relative_eq!(curve.min_multiplier(), 1.0);
        assert_relative_eq!(curve.max_multiplier(), 1.05);

        let falling = must(SampledCurve::from_points(vec![
            SamplePoint::new(0.0, 2.0),
            SamplePoint::new(1.0, 1.0),
        ]));
        assert!(!falling.is_monotonic());
    }

    #[test]
    fn test_scaled() {
        let curve = must(three_points().scaled(0.5));
        let last = curve.last().copied().unwrap_or(SamplePoint::new(0.0, 0.0));
        assert_relative_eq!(last.speed, 1.0);
        assert_relative_eq!(last.multiplier, 0.525);
        assert_eq!(must(three_points().scaled(1.0)), three_points());
    }

    #[test]
    fn test_scaled_rejects_unusable_factors() {
        let subnormal = f64::MIN_POSITIVE / 4.0;
        for factor in [0.0, -1.0, subnormal, f64::NAN, f64::INFINITY] {
            let err = three_points().scaled(factor).err();
            assert_eq!(err.as_ref().and_then(CurveError::field), Some("dpi"), "{factor}");
        }
    }

    #[test]
    fn test_scaled_rejects_overflow() {
        let huge = must(SampledCurve::from_points(vec![
            SamplePoint::new(0.0, 1e20),
            SamplePoint::new(1.0, 1e20),
        ]));
        match huge.scaled(1e300) {
            Err(CurveError::InvalidParameter { field, reason }) => {
                assert_eq!(field, "dpi");
                assert!(reason.contains("not finite"), "{reason}");
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_lut_roundtrip_restores_origin() {
        let parsed = must(SampledCurve::parse_lut("1,1.0200;\n2,1.0500"));
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.points().first(), Some(&SamplePoint::new(0.0, 1.02)));
        assert_eq!(parsed.to_lut_string(), "1,1.0200;\n2,1.0500");
    }

    #[test]
    fn test_parse_lut_tolerates_whitespace_and_trailing_separator() {
        let parsed = must(SampledCurve::parse_lut("  1, 1.5 ;\n 2 ,2.0;\n"));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_parse_lut_errors() {
        assert!(matches!(
            SampledCurve::parse_lut(""),
            Err(CurveError::MalformedLut { entry: 0, .. })
        ));
        assert!(matches!(
            SampledCurve::parse_lut("1,1.0;2"),
            Err(CurveError::MalformedLut { entry: 2, .. })
        ));
        assert!(matches!(
            SampledCurve::parse_lut("1,abc"),
            Err(CurveError::MalformedLut { entry: 1, .. })
        ));
        assert!(matches!(
            SampledCurve::parse_lut("2,1.0;1,1.0"),
            Err(CurveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip_and_validation() {
        let curve = three_points();
        let json = must(serde_json::to_string(&curve));
        assert_eq!(json, "[[0.0,1.0],[1.0,1.02],[2.0,1.05]]");

        let back: SampledCurve = must(serde_json::from_str(&json));
        assert_eq!(back, curve);

        let bad: Result<SampledCurve, _> = serde_json::from_str("[[1.0,1.0]]");
        assert!(bad.is_err());
    }
}
