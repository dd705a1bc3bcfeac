//! Feature slot names, ordering, and defaults.
//!
//! The ordering is the training-time contract: a bundle's `metadata.json`
//! must list exactly these names in exactly this order.

use stylist_core::constants::FEATURE_COUNT;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    // Temporal
    "hour_sin",
    "hour_cos",
    "day_sin",
    "day_cos",
    // Device
    "viewport_width_norm",
    "viewport_height_norm",
    "aspect_ratio",
    "viewport_log_area",
    "touch_capable",
    // Preference
    "prefers_dark",
    // Historical
    "avg_session_duration",
    "total_interactions",
    "avg_scroll_depth",
    "error_rate",
    "engagement",
    // Derived
    "pixel_density",
    "interaction_speed",
    "density_tier",
    "locale_bucket",
    "accessibility_score",
    "network_tier",
];

/// Slot indices by name.
pub mod slot {
    pub const HOUR_SIN: usize = 0;
    pub const HOUR_COS: usize = 1;
    pub const DAY_SIN: usize = 2;
    pub const DAY_COS: usize = 3;
    pub const VIEWPORT_WIDTH: usize = 4;
    pub const VIEWPORT_HEIGHT: usize = 5;
    pub const ASPECT_RATIO: usize = 6;
    pub const LOG_AREA: usize = 7;
    pub const TOUCH: usize = 8;
    pub const PREFERS_DARK: usize = 9;
    pub const AVG_SESSION_DURATION: usize = 10;
    pub const TOTAL_INTERACTIONS: usize = 11;
    pub const AVG_SCROLL_DEPTH: usize = 12;
    pub const ERROR_RATE: usize = 13;
    pub const ENGAGEMENT: usize = 14;
    pub const PIXEL_DENSITY: usize = 15;
    pub const INTERACTION_SPEED: usize = 16;
    pub const DENSITY_TIER: usize = 17;
    pub const LOCALE_BUCKET: usize = 18;
    pub const ACCESSIBILITY: usize = 19;
    pub const NETWORK_TIER: usize = 20;
}

/// Noon, mid-year.
pub const TEMPORAL_DEFAULTS: [f64; 4] = [0.0, -1.0, 0.0, -1.0];

/// A 1920×1080 desktop without touch.
pub const DEVICE_DEFAULTS: [f64; 5] = [1.0, 1.0, 16.0 / 9.0, 1.0, 0.0];

pub const PREFERENCE_DEFAULTS: [f64; 1] = [0.0];

/// Substituted verbatim for visitors with no usable history.
pub const NEW_USER_DEFAULTS: [f64; 5] = [0.5, 0.3, 0.5, 0.02, 0.5];

pub const DERIVED_DEFAULTS: [f64; 6] = [1.0 / 3.0, 0.1, 2.0 / 3.0, 0.0, 0.0, 1.0];

/// All-purpose default vector: every group at its default.
pub const DEFAULT_FEATURES: [f64; FEATURE_COUNT] = [
    TEMPORAL_DEFAULTS[0],
    TEMPORAL_DEFAULTS[1],
    TEMPORAL_DEFAULTS[2],
    TEMPORAL_DEFAULTS[3],
    DEVICE_DEFAULTS[0],
    DEVICE_DEFAULTS[1],
    DEVICE_DEFAULTS[2],
    DEVICE_DEFAULTS[3],
    DEVICE_DEFAULTS[4],
    PREFERENCE_DEFAULTS[0],
    NEW_USER_DEFAULTS[0],
    NEW_USER_DEFAULTS[1],
    NEW_USER_DEFAULTS[2],
    NEW_USER_DEFAULTS[3],
    NEW_USER_DEFAULTS[4],
    DERIVED_DEFAULTS[0],
    DERIVED_DEFAULTS[1],
    DERIVED_DEFAULTS[2],
    DERIVED_DEFAULTS[3],
    DERIVED_DEFAULTS[4],
    DERIVED_DEFAULTS[5],
];

/// Check a list of names against the schema.
pub fn matches_schema<S: AsRef<str>>(names: &[S]) -> Result<(), String> {
    if names.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {FEATURE_COUNT} features, bundle declares {}",
            names.len()
        ));
    }
    for (i, (expected, actual)) in FEATURE_NAMES.iter().zip(names).enumerate() {
        if *expected != actual.as_ref() {
            return Err(format!(
                "feature {i}: expected {expected:?}, bundle declares {:?}",
                actual.as_ref()
            ));
        }
    }
    Ok(())
}
