//! Parameter descriptors for hosts that render editing controls.

use serde::Serialize;

/// Metadata for one editable parameter.
///
/// `key` is the flat settings key (`dpi`, `min_sens`, `micro_range`, …) that
/// the settings store accepts for field-by-field edits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    /// Flat settings key.
    pub key: &'static str,
    /// Short human-readable label.
    pub label: &'static str,
    /// One-sentence explanation shown on hover.
    pub tooltip: &'static str,
    /// Smallest value the control offers.
    pub min: f64,
    /// Largest value the control offers.
    pub max: f64,
    /// Control increment.
    pub step: f64,
    /// Value in the variant's default settings.
    pub default: f64,
}

impl ParameterDescriptor {
    /// Clamp `value` into `[min, max]`. NaN maps to `default`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.default;
        }
        value.clamp(self.min, self.max)
    }

    /// Whether `value` lies in `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Descriptors shown together, e.g. one curve segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterGroup {
    /// Group name: `curve`, `common`, `micro`, `tracking` or `flicking`.
    pub name: &'static str,
    /// Descriptors in display order.
    pub parameters: Vec<ParameterDescriptor>,
}

impl ParameterGroup {
    /// Descriptor with the given flat key, if it belongs to this group.
    pub fn get(&self, key: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dpi() -> ParameterDescriptor {
        ParameterDescriptor {
            key: "dpi",
            label: "DPI",
            tooltip: "Sensor resolution",
            min: 400.0,
            max: 6400.0,
            step: 100.0,
            default: 1600.0,
        }
    }

    #[test]
    fn test_clamp() {
        let d = dpi();
        assert_relative_eq!(d.clamp(100.0), 400.0);
        assert_relative_eq!(d.clamp(10_000.0), 6400.0);
        assert_relative_eq!(d.clamp(800.0), 800.0);
        assert_relative_eq!(d.clamp(f64::NAN), 1600.0);
        assert_relative_eq!(d.clamp(f64::INFINITY), 6400.0);
    }

    #[test]
    fn test_contains() {
        let d = dpi();
        assert!(d.contains(400.0));
        assert!(d.contains(6400.0));
        assert!(!d.contains(399.9));
        assert!(!d.contains(f64::NAN));
    }

    #[test]
    fn test_group_lookup() {
        let group = ParameterGroup {
            name: "common",
            parameters: vec![dpi()],
        };
        assert!(group.get("dpi").is_some());
        assert!(group.get("micro_range").is_none());
    }
}
