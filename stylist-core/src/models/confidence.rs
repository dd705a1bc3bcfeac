use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::constants::MAX_CONFIDENCE;

/// Coarse quality band derived from a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ConfidenceQuality {
    High,
    Medium,
    Low,
    /// Static fallback tokens; no learned model contributed.
    Fallback,
}

/// Per-head confidence contributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConfidenceBreakdown {
    /// Maximum predicted-class probability, 0–100.
    pub classification: Option<f64>,
    /// Training-time goodness of fit of the regressor, 0–100. A static
    /// figure, not a per-request estimate.
    pub regression: Option<f64>,
    /// Bundle tier or fallback path that produced the tokens.
    pub source: String,
}

/// Confidence reported with every prediction, always on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Confidence {
    pub score: f64,
    pub quality: ConfidenceQuality,
    pub breakdown: ConfidenceBreakdown,
}

impl Confidence {
    /// Combine the available head confidences with an arithmetic mean.
    pub fn combined(classification: Option<f64>, regression: Option<f64>, source: &str) -> Self {
        let classification = classification.map(clamp_score);
        let regression = regression.map(clamp_score);
        let parts: Vec<f64> = classification.iter().chain(regression.iter()).copied().collect();
        let score = if parts.is_empty() {
            0.0
        } else {
            parts.iter().sum::<f64>() / parts.len() as f64
        };
        Self {
            score,
            quality: ConfidenceQuality::from_score(score),
            breakdown: ConfidenceBreakdown {
                classification,
                regression,
                source: source.to_string(),
            },
        }
    }

    /// Fixed low confidence for static fallback tokens.
    pub fn fallback(score: f64, source: &str) -> Self {
        Self {
            score: clamp_score(score),
            quality: ConfidenceQuality::Fallback,
            breakdown: ConfidenceBreakdown {
                classification: None,
                regression: None,
                source: source.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.quality == ConfidenceQuality::Fallback
    }
}

/// Legacy producers that only report a bare number.
impl From<f64> for Confidence {
    fn from(score: f64) -> Self {
        let score = clamp_score(score);
        Self {
            score,
            quality: ConfidenceQuality::from_score(score),
            breakdown: ConfidenceBreakdown {
                source: "legacy".to_string(),
                ..Default::default()
            },
        }
    }
}

impl ConfidenceQuality {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 50.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, MAX_CONFIDENCE)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_is_mean_of_present_heads() {
        let c = Confidence::combined(Some(90.0), Some(70.0), "dual");
        assert!((c.score - 80.0).abs() < 1e-9);
        assert_eq!(c.quality, ConfidenceQuality::High);

        let single = Confidence::combined(Some(40.0), None, "individual");
        assert!((single.score - 40.0).abs() < 1e-9);
        assert_eq!(single.quality, ConfidenceQuality::Low);
    }

    #[test]
    fn scores_are_clamped() {
        let c = Confidence::combined(Some(250.0), Some(-3.0), "dual");
        assert_eq!(c.breakdown.classification, Some(100.0));
        assert_eq!(c.breakdown.regression, Some(0.0));
        assert_eq!(Confidence::from(f64::NAN).score, 0.0);
    }

    #[test]
    fn bare_number_maps_into_structure() {
        let c = Confidence::from(65.0);
        assert_eq!(c.quality, ConfidenceQuality::Medium);
        assert_eq!(c.breakdown.source, "legacy");
    }
}
