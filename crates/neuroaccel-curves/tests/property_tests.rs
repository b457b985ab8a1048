//! Property-based tests for curve evaluation.
//!
//! These tests verify properties that must hold for every valid parameter set.

use neuroaccel_curves::{
    CommonParameters, CurveParameters, CurveParameters3, CurveVariant, SegmentParameters,
    calculate_curve, get_default_settings,
};
use quickcheck_macros::quickcheck;

const TOLERANCE: f64 = 1e-9;

/// Map an arbitrary `f64` into `[0, 1)`.
fn unit(v: f64) -> f64 {
    if v.is_finite() {
        v.abs().fract()
    } else {
        0.5
    }
}

fn lerp(v: f64, lo: f64, hi: f64) -> f64 {
    lo + unit(v) * (hi - lo)
}

fn single(min: f64, span: f64, offset: f64, range: f64, base: f64) -> CurveParameters {
    let min_sens = lerp(min, 0.1, 2.0);
    CurveParameters {
        min_sens,
        max_sens: min_sens + lerp(span, 0.0, 8.0),
        offset: lerp(offset, 0.0, 100.0),
        range: lerp(range, 1.0, 200.0),
        growth_base: lerp(base, 0.5, 1.5),
    }
}

fn segment(range: f64, base: f64, max_sens: f64) -> SegmentParameters {
    SegmentParameters {
        range: lerp(range, 1.0, 100.0),
        growth_base: lerp(base, 1.0, 1.5),
        max_sens,
    }
}

fn segmented(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> CurveParameters3 {
    let min_sens = 0.15;
    let micro_max = min_sens + lerp(a.2, 0.0, 1.0);
    let tracking_max = micro_max + lerp(b.2, 0.0, 2.0);
    let flicking_max = tracking_max + lerp(c.2, 0.0, 4.0);
    CurveParameters3 {
        common: CommonParameters {
            dpi: 1600.0,
            min_sens,
        },
        micro: segment(a.0, a.1, micro_max),
        tracking: segment(b.0, b.1, tracking_max),
        flicking: segment(c.0, c.1, flicking_max),
    }
}

#[quickcheck]
fn prop_flat_below_offset(min: f64, span: f64, offset: f64, range: f64, base: f64, s: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let speed = lerp(s, -10.0, params.offset);
    (params.evaluate(speed) - params.min_sens).abs() < f64::EPSILON
}

#[quickcheck]
fn prop_flat_above_window(min: f64, span: f64, offset: f64, range: f64, base: f64, s: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let speed = params.window_end() + lerp(s, 0.0, 1000.0);
    (params.evaluate(speed) - params.max_sens).abs() < f64::EPSILON
}

#[quickcheck]
fn prop_single_monotonic(min: f64, span: f64, offset: f64, range: f64, base: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let end = params.window_end() * 1.5;
    let mut previous = params.evaluate(0.0);
    for i in 1..=500 {
        let value = params.evaluate(end * f64::from(i) / 500.0);
        if value + TOLERANCE < previous {
            return false;
        }
        previous = value;
    }
    true
}

#[quickcheck]
fn prop_output_between_endpoints(min: f64, span: f64, offset: f64, range: f64, base: f64, s: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let value = params.evaluate(lerp(s, 0.0, 400.0));
    value >= params.min_sens - TOLERANCE && value <= params.max_sens + TOLERANCE
}

#[quickcheck]
fn prop_segmented_continuous_at_boundaries(
    a: (f64, f64, f64),
    b: (f64, f64, f64),
    c: (f64, f64, f64),
) -> bool {
    let params = segmented(a, b, c);
    let bounds = params.boundaries();
    let eps = 1e-7;

    let checks = [
        (bounds.micro_end, params.micro.max_sens),
        (bounds.tracking_end, params.tracking.max_sens),
        (bounds.flicking_end, params.flicking.max_sens),
    ];
    checks.iter().all(|&(at, expected)| {
        let left = params.evaluate(at - eps);
        let exact = params.evaluate(at);
        let right = params.evaluate(at + eps);
        (exact - expected).abs() < TOLERANCE
            && (left - expected).abs() < 1e-4
            && (right - expected).abs() < 1e-4
    })
}

#[quickcheck]
fn prop_segmented_monotonic(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> bool {
    let params = segmented(a, b, c);
    match params.sample() {
        Ok(curve) => curve.curve().is_monotonic(),
        Err(_) => false,
    }
}

#[quickcheck]
fn prop_sampling_is_deterministic(min: f64, span: f64, offset: f64, range: f64, base: f64) -> bool {
    let params = single(min, span, offset, range, base);
    match (params.sample(), params.sample()) {
        (Ok(a), Ok(b)) => a == b && a.to_lut_string() == b.to_lut_string(),
        _ => false,
    }
}

#[quickcheck]
fn prop_sample_covers_window(min: f64, span: f64, offset: f64, range: f64, base: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let Ok(curve) = params.sample() else {
        return false;
    };
    let starts_at_zero = curve.points().first().is_some_and(|p| p.speed.abs() < f64::EPSILON);
    let reaches_plateau = curve
        .last()
        .is_some_and(|p| {
            p.speed >= params.window_end() && (p.multiplier - params.max_sens).abs() < TOLERANCE
        });
    starts_at_zero && reaches_plateau
}

#[quickcheck]
fn prop_lookup_matches_samples(min: f64, span: f64, offset: f64, range: f64, base: f64) -> bool {
    let params = single(min, span, offset, range, base);
    let Ok(curve) = params.sample() else {
        return false;
    };
    curve
        .points()
        .iter()
        .all(|p| (curve.lookup(p.speed) - p.multiplier).abs() < TOLERANCE)
}

#[quickcheck]
fn prop_dpi_scales_speeds(dpi: f64) -> bool {
    let mut settings = get_default_settings(CurveVariant::Single);
    let dpi = lerp(dpi, 400.0, 6400.0);
    settings.set_dpi(dpi);
    let (Ok(scaled), Ok(base)) = (
        calculate_curve(&settings),
        calculate_curve(&get_default_settings(CurveVariant::Single)),
    ) else {
        return false;
    };
    let factor = dpi / 1600.0;
    scaled.len() == base.len()
        && scaled
            .points()
            .iter()
            .zip(base.points())
            .all(|(s, b)| (s.speed - b.speed * factor).abs() < TOLERANCE)
}
