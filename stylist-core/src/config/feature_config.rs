use serde::{Deserialize, Serialize};

use super::defaults;

/// Normalization references for the device feature group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub reference_width: f64,
    pub reference_height: f64,
    pub reference_pixel_ratio: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            reference_width: defaults::DEFAULT_REFERENCE_WIDTH,
            reference_height: defaults::DEFAULT_REFERENCE_HEIGHT,
            reference_pixel_ratio: defaults::DEFAULT_REFERENCE_PIXEL_RATIO,
        }
    }
}
