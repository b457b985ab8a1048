//! The persisted/exchanged settings unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::REFERENCE_DPI;
use crate::error::{CurveError, CurveWarning};
use crate::params::CurveParameters;
use crate::segmented::CurveParameters3;
use crate::validation;

/// Which curve family a settings value uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveVariant {
    /// One offset and one ramp.
    Single,
    /// Micro, tracking and flicking ramps.
    #[default]
    Segmented,
}

impl CurveVariant {
    /// Both variants.
    pub const ALL: [CurveVariant; 2] = [CurveVariant::Single, CurveVariant::Segmented];

    /// Lowercase name as used in settings documents and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            CurveVariant::Single => "single",
            CurveVariant::Segmented => "segmented",
        }
    }
}

impl fmt::Display for CurveVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurveVariant {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(CurveVariant::Single),
            "segmented" | "three_segment" => Ok(CurveVariant::Segmented),
            other => Err(CurveError::invalid(
                "variant",
                format!("expected 'single' or 'segmented', got '{other}'"),
            )),
        }
    }
}

/// Curve configuration as stored and exchanged with hosts.
///
/// Serialized with a `"curve"` tag:
///
/// ```json
/// { "curve": "single", "dpi": 1600.0, "params": { "min_sens": 1.0, ... } }
/// { "curve": "segmented", "common": { "dpi": 1600.0, ... }, "micro": { ... }, ... }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum CurveSettings {
    /// Single-segment curve.
    Single {
        /// Sensor resolution.
        dpi: f64,
        /// Curve parameters.
        params: CurveParameters,
    },
    /// Three-segment curve; the dpi lives in `common.dpi`.
    Segmented(CurveParameters3),
}

impl Default for CurveSettings {
    fn default() -> Self {
        CurveSettings::Segmented(CurveParameters3::default())
    }
}

impl CurveSettings {
    /// Default settings of one variant.
    pub fn defaults(variant: CurveVariant) -> Self {
        match variant {
            CurveVariant::Single => CurveSettings::Single {
                dpi: REFERENCE_DPI,
                params: CurveParameters::default(),
            },
            CurveVariant::Segmented => CurveSettings::Segmented(CurveParameters3::default()),
        }
    }

    /// The curve family in use.
    pub fn variant(&self) -> CurveVariant {
        match self {
            CurveSettings::Single { .. } => CurveVariant::Single,
            CurveSettings::Segmented(_) => CurveVariant::Segmented,
        }
    }

    /// Sensor resolution.
    pub fn dpi(&self) -> f64 {
        match self {
            CurveSettings::Single { dpi, .. } => *dpi,
            CurveSettings::Segmented(params) => params.common.dpi,
        }
    }

    /// Replace the sensor resolution.
    pub fn set_dpi(&mut self, value: f64) {
        match self {
            CurveSettings::Single { dpi, .. } => *dpi = value,
            CurveSettings::Segmented(params) => params.common.dpi = value,
        }
    }

    /// Factor applied to both axes of the sampled curve: `dpi / 1600`.
    pub fn dpi_scale(&self) -> f64 {
        self.dpi() / REFERENCE_DPI
    }

    /// Validate dpi and curve parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidParameter`] naming the first failing field.
    pub fn validate(&self) -> Result<(), CurveError> {
        match self {
            CurveSettings::Single { dpi, params } => {
                validation::positive("dpi", *dpi)?;
                params.validate()
            }
            CurveSettings::Segmented(params) => params.validate(),
        }
    }

    /// Non-fatal findings about the curve parameters.
    pub fn warnings(&self) -> Vec<CurveWarning> {
        match self {
            CurveSettings::Single { params, .. } => params.warnings(),
            CurveSettings::Segmented(params) => params.warnings(),
        }
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

    #[test]
    fn test_default_is_segmented() {
        assert_eq!(CurveSettings::default().variant(), CurveVariant::Segmented);
        assert_eq!(CurveVariant::default(), CurveVariant::Segmented);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(must("single".parse::<CurveVariant>()), CurveVariant::Single);
        assert_eq!(
            must(" Segmented ".parse::<CurveVariant>()),
            CurveVariant::Segmented
        );
        assert!("bezier".parse::<CurveVariant>().is_err());
    }

    #[test]
    fn test_variant_rejects_unknown_families() {
        assert_eq!(CurveVariant::ALL.len(), 2);
        let err = "neuro_adaptive".parse::<CurveVariant>().err();
        assert_eq!(err.as_ref().and_then(CurveError::field), Some("variant"));

        let json = r#"{"curve":"neuro_adaptive","phase_boundaries":[18,55,130]}"#;
        assert!(serde_json::from_str::<CurveSettings>(json).is_err());
        assert!(serde_json::from_str::<CurveVariant>(r#""neuro_adaptive""#).is_err());
    }

    #[test]
    fn test_dpi_accessors() {
        for variant in CurveVariant::ALL {
            let mut settings = CurveSettings::defaults(variant);
            assert_relative_eq!(settings.dpi(), 1600.0);
            assert_relative_eq!(settings.dpi_scale(), 1.0);
            settings.set_dpi(800.0);
            assert_relative_eq!(settings.dpi(), 800.0);
            assert_relative_eq!(settings.dpi_scale(), 0.5);
        }
    }

    #[test]
    fn test_validate_checks_dpi() {
        let mut settings = CurveSettings::defaults(CurveVariant::Single);
        settings.set_dpi(0.0);
        let err = settings.validate().err();
        assert_eq!(err.as_ref().and_then(CurveError::field), Some("dpi"));

        let mut settings = CurveSettings::defaults(CurveVariant::Segmented);
        settings.set_dpi(-1.0);
        let err = settings.validate().err();
        assert_eq!(err.as_ref().and_then(CurveError::field), Some("common.dpi"));
    }

    #[test]
    fn test_tagged_serialization() {
        let single = must(serde_json::to_value(CurveSettings::defaults(
            CurveVariant::Single,
        )));
        assert_eq!(single.get("curve").and_then(|v| v.as_str()), Some("single"));
        assert!(single.get("params").is_some());

        let segmented = must(serde_json::to_value(CurveSettings::default()));
        assert_eq!(
            segmented.get("curve").and_then(|v| v.as_str()),
            Some("segmented")
        );
        assert!(segmented.get("micro").is_some());

        let back: CurveSettings = must(serde_json::from_value(segmented));
        assert_eq!(back, CurveSettings::default());
    }
}
