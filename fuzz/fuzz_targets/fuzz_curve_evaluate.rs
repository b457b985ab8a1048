//! Fuzzes curve evaluation and sampling with arbitrary parameter floats.
//!
//! Raw bytes become parameters (NaN, infinity and subnormals included).
//! Evaluation must never panic and must stay between the ramp endpoints;
//! sampling must either fail validation or produce a well-formed curve.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_curve_evaluate
#![no_main]
use libfuzzer_sys::fuzz_target;
use neuroaccel_curves::{
    CommonParameters, CurveParameters, CurveParameters3, SegmentParameters,
};

fn floats(data: &[u8]) -> impl Iterator<Item = f64> + '_ {
    data.chunks_exact(8).map(|c| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(c);
        f64::from_le_bytes(bytes)
    })
}

fuzz_target!(|data: &[u8]| {
    let mut values = floats(data);
    let mut next = || values.next().unwrap_or(1.0);

    let single = CurveParameters {
        min_sens: next(),
        max_sens: next(),
        offset: next(),
        range: next(),
        growth_base: next(),
    };
    let speed = next();
    let out = single.evaluate(speed);
    let bounded = [single.min_sens, single.max_sens]
        .iter()
        .all(|v| v.is_finite() && v.abs() <= 1e6);
    if bounded && single.offset.is_finite() && single.range.is_finite() {
        let lo = single.min_sens.min(single.max_sens);
        let hi = single.min_sens.max(single.max_sens);
        assert!(out >= lo - 1e-6 && out <= hi + 1e-6, "{out} outside [{lo}, {hi}]");
    }
    if let Ok(curve) = single.sample() {
        assert!(!curve.is_empty());
        assert!(curve.points().windows(2).all(|w| w[0].speed < w[1].speed));
    }

    let mut segment = || SegmentParameters {
        range: next(),
        growth_base: next(),
        max_sens: next(),
    };
    let params = CurveParameters3 {
        common: CommonParameters {
            dpi: 1600.0,
            min_sens: single.min_sens,
        },
        micro: segment(),
        tracking: segment(),
        flicking: segment(),
    };
    let _ = params.evaluate(speed);
    if let Ok(curve) = params.sample() {
        let total: usize = curve.segments().iter().map(|(_, points)| points.len()).sum();
        assert!(total >= curve.curve().len());
    }
});
