use serde::{Deserialize, Serialize};
use stylist_core::constants::{FEATURE_CLAMP, FEATURE_COUNT};
use stylist_core::errors::FeatureError;

use crate::schema::{DEFAULT_FEATURES, FEATURE_NAMES};

/// Fixed-length, ordered, range-clamped feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// The all-purpose default vector.
    pub fn default_vector() -> Self {
        Self {
            values: DEFAULT_FEATURES,
        }
    }

    /// Build from raw values. The length must match the schema exactly and
    /// every value must be finite; values are clamped to `[-10, 10]`.
    pub fn try_from_slice(raw: &[f64]) -> Result<Self, FeatureError> {
        if raw.len() != FEATURE_COUNT {
            return Err(FeatureError::LengthMismatch {
                expected: FEATURE_COUNT,
                actual: raw.len(),
            });
        }
        let mut values = [0.0; FEATURE_COUNT];
        for (i, v) in raw.iter().enumerate() {
            if !v.is_finite() {
                return Err(FeatureError::NonFinite {
                    index: i,
                    name: FEATURE_NAMES[i],
                });
            }
            values[i] = v.clamp(-FEATURE_CLAMP, FEATURE_CLAMP);
        }
        Ok(Self { values })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.values.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Slot names paired with values, for debugging and logging.
    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.values).collect()
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::default_vector()
    }
}
