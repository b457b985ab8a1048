//! Flat `prefix_field` key map over [`CurveSettings`].
//!
//! Keys are `dpi`, `min_sens` and, for the segmented variant,
//! `<segment>_<field>` such as `micro_range` or `flicking_growth_base`. The
//! single variant uses its plain field names. Values are decimal strings.

use std::collections::BTreeMap;

use neuroaccel_curves::{CurveParameters, CurveParameters3, CurveSettings, Segment};
use tracing::{debug, warn};

use crate::error::{SettingsError, SettingsResult};

const SINGLE_KEYS: [&str; 6] = ["dpi", "min_sens", "max_sens", "offset", "range", "growth_base"];
const SEGMENT_FIELDS: [&str; 3] = ["range", "growth_base", "max_sens"];

/// All flat keys accepted for `settings`' variant, in display order.
pub fn flat_keys(settings: &CurveSettings) -> Vec<String> {
    match settings {
        CurveSettings::Single { .. } => SINGLE_KEYS.iter().map(|k| (*k).to_string()).collect(),
        CurveSettings::Segmented(_) => {
            let mut keys = vec!["dpi".to_string(), "min_sens".to_string()];
            for segment in Segment::ALL {
                keys.extend(SEGMENT_FIELDS.iter().map(|f| format!("{segment}_{f}")));
            }
            keys
        }
    }
}

/// Current value of one flat key.
///
/// # Errors
///
/// Returns [`SettingsError::UnknownField`] if `key` is not a field of the
/// settings' variant.
pub fn get_field(settings: &CurveSettings, key: &str) -> SettingsResult<f64> {
    match settings {
        CurveSettings::Single { dpi, params } => match key {
            "dpi" => Ok(*dpi),
            _ => single_field(params, key).copied(),
        },
        CurveSettings::Segmented(params) => segmented_field(params, key).copied(),
    }
}

/// Set one flat key.
///
/// Only finiteness is checked here; domain checks happen when the curve is
/// calculated or saved.
///
/// # Errors
///
/// Returns [`SettingsError::UnknownField`] for keys outside the variant and
/// [`SettingsError::InvalidValue`] for non-finite values.
pub fn set_field(settings: &mut CurveSettings, key: &str, value: f64) -> SettingsResult<()> {
    if !value.is_finite() {
        return Err(SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    let slot = match settings {
        CurveSettings::Single { dpi, params } => match key {
            "dpi" => dpi,
            _ => single_field_mut(params, key)?,
        },
        CurveSettings::Segmented(params) => segmented_field_mut(params, key)?,
    };
    *slot = value;
    Ok(())
}

/// Parse `value` and set one flat key.
///
/// # Errors
///
/// As [`set_field`], plus [`SettingsError::InvalidValue`] if `value` is not a
/// number.
pub fn set_field_str(settings: &mut CurveSettings, key: &str, value: &str) -> SettingsResult<()> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
    set_field(settings, key, parsed)
}

/// Every field of `settings` as flat key/value strings.
pub fn to_flat_map(settings: &CurveSettings) -> BTreeMap<String, String> {
    flat_keys(settings)
        .into_iter()
        .filter_map(|key| {
            let value = get_field(settings, &key).ok()?;
            Some((key, value.to_string()))
        })
        .collect()
}

/// Apply flat key/value pairs, skipping entries that do not apply.
///
/// Unknown keys and unparsable or non-finite values are logged and skipped,
/// leaving the field unchanged. Returns the number of fields set.
pub fn apply_flat_map<I, K, V>(settings: &mut CurveSettings, entries: I) -> usize
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut applied = 0;
    for (key, value) in entries {
        let (key, value) = (key.as_ref(), value.as_ref());
        match set_field_str(settings, key, value) {
            Ok(()) => applied += 1,
            Err(e) => warn!(key, value, error = %e, "Skipping settings entry"),
        }
    }
    debug!(applied, "Applied flat settings");
    applied
}

/// Parse a flat JSON object such as `{"micro_range": 20, "dpi": "800"}`.
///
/// Numbers and strings are kept as strings; other value types are dropped.
///
/// # Errors
///
/// Returns [`SettingsError::Serialization`] if `text` is not a JSON object.
pub fn parse_flat_json(text: &str) -> SettingsResult<BTreeMap<String, String>> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Number(n) => Some((key, n.to_string())),
            serde_json::Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

fn single_field<'a>(params: &'a CurveParameters, key: &str) -> SettingsResult<&'a f64> {
    match key {
        "min_sens" => Ok(&params.min_sens),
        "max_sens" => Ok(&params.max_sens),
        "offset" => Ok(&params.offset),
        "range" => Ok(&params.range),
        "growth_base" => Ok(&params.growth_base),
        _ => Err(SettingsError::UnknownField(key.to_string())),
    }
}

fn single_field_mut<'a>(params: &'a mut CurveParameters, key: &str) -> SettingsResult<&'a mut f64> {
    match key {
        "min_sens" => Ok(&mut params.min_sens),
        "max_sens" => Ok(&mut params.max_sens),
        "offset" => Ok(&mut params.offset),
        "range" => Ok(&mut params.range),
        "growth_base" => Ok(&mut params.growth_base),
        _ => Err(SettingsError::UnknownField(key.to_string())),
    }
}

fn split_segment_key(key: &str) -> Option<(Segment, &str)> {
    Segment::ALL.into_iter().find_map(|segment| {
        key.strip_prefix(segment.name())
            .and_then(|rest| rest.strip_prefix('_'))
            .map(|field| (segment, field))
    })
}

fn segmented_field<'a>(params: &'a CurveParameters3, key: &str) -> SettingsResult<&'a f64> {
    match key {
        "dpi" => return Ok(&params.common.dpi),
        "min_sens" => return Ok(&params.common.min_sens),
        _ => {}
    }
    let (segment, field) =
        split_segment_key(key).ok_or_else(|| SettingsError::UnknownField(key.to_string()))?;
    let segment = params.segment(segment);
    match field {
        "range" => Ok(&segment.range),
        "growth_base" => Ok(&segment.growth_base),
        "max_sens" => Ok(&segment.max_sens),
        _ => Err(SettingsError::UnknownField(key.to_string())),
    }
}

fn segmented_field_mut<'a>(
    params: &'a mut CurveParameters3,
    key: &str,
) -> SettingsResult<&'a mut f64> {
    match key {
        "dpi" => return Ok(&mut params.common.dpi),
        "min_sens" => return Ok(&mut params.common.min_sens),
        _ => {}
    }
    let (segment, field) =
        split_segment_key(key).ok_or_else(|| SettingsError::UnknownField(key.to_string()))?;
    let segment = params.segment_mut(segment);
    match field {
        "range" => Ok(&mut segment.range),
        "growth_base" => Ok(&mut segment.growth_base),
        "max_sens" => Ok(&mut segment.max_sens),
        _ => Err(SettingsError::UnknownField(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use neuroaccel_curves::CurveVariant;

    #[test]
    fn test_segmented_keys() {
        let keys = flat_keys(&CurveSettings::default());
        assert_eq!(keys.len(), 11);
        assert_eq!(keys.first().map(String::as_str), Some("dpi"));
        assert!(keys.iter().any(|k| k == "tracking_growth_base"));
    }

    #[test]
    fn test_flat_map_values() {
        let map = to_flat_map(&CurveSettings::default());
        assert_eq!(map.get("dpi").map(String::as_str), Some("1600"));
        assert_eq!(map.get("min_sens").map(String::as_str), Some("0.15"));
        assert_eq!(map.get("micro_range").map(String::as_str), Some("20"));
        assert_eq!(map.get("flicking_max_sens").map(String::as_str), Some("2.5"));
        assert_eq!(map.len(), 11);
    }

    #[test]
    fn test_set_field_segmented() -> Result<(), Box<dyn std::error::Error>> {
        let mut settings = CurveSettings::default();
        set_field(&mut settings, "tracking_max_sens", 1.4)?;
        set_field(&mut settings, "dpi", 800.0)?;
        assert_relative_eq!(get_field(&settings, "tracking_max_sens")?, 1.4);
        assert_relative_eq!(settings.dpi(), 800.0);
        Ok(())
    }

    #[test]
    fn test_set_field_single() -> Result<(), Box<dyn std::error::Error>> {
        let mut settings = CurveSettings::defaults(CurveVariant::Single);
        set_field(&mut settings, "offset", 8.0)?;
        assert_relative_eq!(get_field(&settings, "offset")?, 8.0);
        assert!(matches!(
            set_field(&mut settings, "micro_range", 8.0),
            Err(SettingsError::UnknownField(k)) if k == "micro_range"
        ));
        Ok(())
    }

    #[test]
    fn test_set_field_rejects_unknown_and_non_finite() {
        let mut settings = CurveSettings::default();
        for key in ["offset", "micro", "micro_", "micro_offset", "range", "turbo_range"] {
            assert!(
                matches!(set_field(&mut settings, key, 1.0), Err(SettingsError::UnknownField(_))),
                "accepted {key}"
            );
        }
        assert!(matches!(
            set_field(&mut settings, "dpi", f64::NAN),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_field_str(&mut settings, "dpi", "fast"),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_apply_flat_map_skips_bad_entries() {
        let mut settings = CurveSettings::default();
        let entries = [
            ("micro_range", "25"),
            ("tracking_growth_base", " 1.02 "),
            ("flicking_max_sens", "lots"),
            ("unknown_key", "1"),
            ("dpi", "inf"),
        ];
        let applied = apply_flat_map(&mut settings, entries);
        assert_eq!(applied, 2);

        let map = to_flat_map(&settings);
        assert_eq!(map.get("micro_range").map(String::as_str), Some("25"));
        assert_eq!(map.get("tracking_growth_base").map(String::as_str), Some("1.02"));
        assert_eq!(map.get("flicking_max_sens").map(String::as_str), Some("2.5"));
        assert_eq!(map.get("dpi").map(String::as_str), Some("1600"));
    }

    #[test]
    fn test_flat_map_roundtrip() {
        let mut source = CurveSettings::default();
        apply_flat_map(&mut source, [("micro_growth_base", "1.3"), ("min_sens", "0.2")]);

        let mut target = CurveSettings::default();
        let applied = apply_flat_map(&mut target, to_flat_map(&source));
        assert_eq!(applied, 11);
        assert_eq!(target, source);
    }

    #[test]
    fn test_parse_flat_json() -> Result<(), Box<dyn std::error::Error>> {
        let map = parse_flat_json(r#"{"micro_range": 20, "dpi": "800", "nested": {"x": 1}}"#)?;
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("micro_range").map(String::as_str), Some("20"));
        assert_eq!(map.get("dpi").map(String::as_str), Some("800"));
        assert!(parse_flat_json("[1, 2]").is_err());
        Ok(())
    }
}
