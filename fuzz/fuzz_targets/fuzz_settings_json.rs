//! Fuzzes settings document and flat key/value parsing.
//!
//! Must never panic on any input; accepted documents must re-serialize.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_settings_json
#![no_main]
use libfuzzer_sys::fuzz_target;
use neuroaccel_settings::{CurveSettings, apply_flat_map, from_json, parse_flat_json, to_json};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(settings) = from_json(text) {
        assert!(to_json(&settings).is_ok());
    }
    if let Ok(map) = parse_flat_json(text) {
        let mut settings = CurveSettings::default();
        let _ = apply_flat_map(&mut settings, map);
        let _ = settings.validate();
    }
});
