use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lenient;

/// Immutable snapshot of one request's signal set.
///
/// Built upstream from request headers and body. Every field is optional:
/// the feature processor substitutes defaults for anything missing or
/// malformed instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserContext {
    pub timestamp: Option<DateTime<Utc>>,
    /// `prefers-color-scheme`: "dark", "light", or "no-preference".
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub prefers_color_scheme: Option<String>,
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub viewport_width: Option<f64>,
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub viewport_height: Option<f64>,
    pub touch_capable: Option<bool>,
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub pixel_ratio: Option<f64>,
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub user_agent: Option<String>,
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub session_id: Option<String>,
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub path: Option<String>,
    /// BCP 47 language tag, e.g. "en-US".
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub locale: Option<String>,
    pub network: Option<NetworkHints>,
    pub accessibility: Option<AccessibilityHints>,
}

/// Network Information API hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkHints {
    /// "slow-2g", "2g", "3g", or "4g".
    pub effective_type: Option<String>,
    pub downlink_mbps: Option<f64>,
    pub save_data: Option<bool>,
}

/// Accessibility media-query hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityHints {
    pub prefers_reduced_motion: Option<bool>,
    /// `prefers-contrast`: "more", "less", "no-preference".
    pub prefers_contrast: Option<String>,
    pub forced_colors: Option<bool>,
}

/// Parsed `prefers-color-scheme` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Dark,
    Light,
    NoPreference,
}

impl ColorScheme {
    /// Parse a raw header value. Unknown values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "no-preference" | "no_preference" | "none" | "" => Some(Self::NoPreference),
            _ => None,
        }
    }
}

impl UserContext {
    /// Context with only the viewport set.
    pub fn with_viewport(width: f64, height: f64) -> Self {
        Self {
            viewport_width: Some(width),
            viewport_height: Some(height),
            ..Default::default()
        }
    }

    pub fn color_scheme(&self) -> Option<ColorScheme> {
        self.prefers_color_scheme.as_deref().and_then(ColorScheme::parse)
    }

    pub fn prefers_dark(&self) -> bool {
        self.color_scheme() == Some(ColorScheme::Dark)
    }
}
