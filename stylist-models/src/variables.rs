//! Plausible ranges and formatting for regressed style variables.

use stylist_core::models::design_tokens::variable_key;

/// Range and unit of one regressed variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableSpec {
    pub target: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
    pub decimals: usize,
    /// Used when the model produces a non-finite value.
    pub default: f64,
}

const KNOWN: &[VariableSpec] = &[
    VariableSpec { target: "font_size_base", min: 0.8, max: 2.0, unit: "rem", decimals: 3, default: 1.0 },
    VariableSpec { target: "line_height", min: 1.2, max: 2.0, unit: "", decimals: 2, default: 1.5 },
    VariableSpec { target: "spacing_unit", min: 0.25, max: 2.0, unit: "rem", decimals: 3, default: 1.0 },
    VariableSpec { target: "border_radius", min: 0.0, max: 24.0, unit: "px", decimals: 0, default: 4.0 },
    VariableSpec { target: "content_max_width", min: 320.0, max: 1600.0, unit: "px", decimals: 0, default: 1200.0 },
    VariableSpec { target: "touch_target_size", min: 32.0, max: 64.0, unit: "px", decimals: 0, default: 44.0 },
    VariableSpec { target: "animation_duration", min: 0.0, max: 600.0, unit: "ms", decimals: 0, default: 200.0 },
];

/// Fallback for targets without a known range.
const UNKNOWN: VariableSpec = VariableSpec {
    target: "",
    min: -10_000.0,
    max: 10_000.0,
    unit: "",
    decimals: 3,
    default: 0.0,
};

impl VariableSpec {
    pub fn lookup(target: &str) -> &'static VariableSpec {
        let normalized = target.trim().trim_start_matches('-').replace('-', "_");
        KNOWN
            .iter()
            .find(|s| s.target.eq_ignore_ascii_case(&normalized))
            .unwrap_or(&UNKNOWN)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            self.default
        }
    }

    /// Clamp then format, e.g. `1.125rem`, `1.5`, `16px`.
    pub fn format(&self, value: f64) -> String {
        let clamped = self.clamp(value);
        let mut number = format!("{:.*}", self.decimals, clamped);
        if number.contains('.') {
            let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
            number.truncate(trimmed);
        }
        if number == "-0" {
            number = "0".to_string();
        }
        format!("{number}{}", self.unit)
    }
}

/// `(--css-name, formatted value)` for a regressed target.
pub fn format_variable(target: &str, value: f64) -> (String, String) {
    (variable_key(target), VariableSpec::lookup(target).format(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_is_clamped_and_suffixed() {
        assert_eq!(format_variable("font_size_base", 1.125), ("--font-size-base".into(), "1.125rem".into()));
        assert_eq!(format_variable("font_size_base", 5.0).1, "2rem");
        assert_eq!(format_variable("font_size_base", 0.1).1, "0.8rem");
        assert_eq!(format_variable("font_size_base", f64::NAN).1, "1rem");
    }

    #[test]
    fn unitless_and_pixel_values() {
        assert_eq!(format_variable("line_height", 1.55).1, "1.55");
        assert_eq!(format_variable("border_radius", 7.6).1, "8px");
        assert_eq!(format_variable("content_max_width", 99_999.0).1, "1600px");
    }

    #[test]
    fn unknown_targets_get_a_generic_range() {
        let (key, value) = format_variable("Card_Elevation", 2.5);
        assert_eq!(key, "--card-elevation");
        assert_eq!(value, "2.5");
        assert_eq!(format_variable("x", -0.0001).1, "0");
    }

    #[test]
    fn lookup_accepts_css_names() {
        assert_eq!(VariableSpec::lookup("--spacing-unit").target, "spacing_unit");
    }
}
