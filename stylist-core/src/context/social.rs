use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Population-level percentages used as weak priors (e.g. the share of
/// visitors preferring dark mode). May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialAggregate {
    pub percentages: BTreeMap<String, f64>,
}

impl SocialAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, percentage: f64) -> Self {
        self.percentages.insert(key.into(), percentage);
        self
    }

    /// A percentage as a fraction in `[0, 1]`, or `None` if absent or not finite.
    pub fn fraction(&self, key: &str) -> Option<f64> {
        self.percentages
            .get(key)
            .copied()
            .filter(|v| v.is_finite())
            .map(|v| (v / 100.0).clamp(0.0, 1.0))
    }

    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }
}
