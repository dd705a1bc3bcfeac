use serde::{Deserialize, Serialize};

use super::lenient;

/// Summary of one past session for a user or anonymous identity.
///
/// Fields are optional and deserialized leniently: history comes from an
/// external store and may hold missing, negative, or non-numeric values.
/// Sanitizing them is the feature processor's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalEvent {
    /// Session duration in seconds.
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub interaction_count: Option<f64>,
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub error_count: Option<f64>,
    /// Deepest scroll position reached, as a fraction (or percentage) of the page.
    #[serde(deserialize_with = "lenient::f64_or_none")]
    pub scroll_depth: Option<f64>,
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub page: Option<String>,
    #[serde(deserialize_with = "lenient::string_or_none")]
    pub input_type: Option<String>,
}

impl HistoricalEvent {
    pub fn new(duration: f64, interaction_count: f64, error_count: f64) -> Self {
        Self {
            duration: Some(duration),
            interaction_count: Some(interaction_count),
            error_count: Some(error_count),
            ..Default::default()
        }
    }
}
