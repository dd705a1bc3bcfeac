/// Stylist version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Length of the feature vector every model bundle is trained against.
pub const FEATURE_COUNT: usize = 21;

/// Every feature value is clamped to `[-FEATURE_CLAMP, FEATURE_CLAMP]`.
pub const FEATURE_CLAMP: f64 = 10.0;

/// Confidence scores are reported on a 0–100 scale.
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Confidence reported when a prediction falls back to the static token set.
pub const FALLBACK_CONFIDENCE: f64 = 25.0;

/// Confidence reported by the hard-coded emergency token set.
pub const EMERGENCY_CONFIDENCE: f64 = 10.0;

/// Social aggregate key holding the share of visitors preferring dark mode.
pub const SOCIAL_DARK_MODE_KEY: &str = "dark_mode_percentage";
