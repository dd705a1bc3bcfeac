//! `metadata.json`: the bundle's schema contract and training metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stylist_core::errors::ModelError;
use stylist_features::schema::matches_schema;

use crate::ModelResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleMetadata {
    pub version: String,
    /// Must equal the feature schema exactly, in order.
    pub feature_names: Vec<String>,
    /// Predicted class index → style classes.
    #[serde(default)]
    pub class_mapping: BTreeMap<usize, Vec<String>>,
    /// Regressor output order.
    #[serde(default)]
    pub target_names: Vec<String>,
    #[serde(default)]
    pub metrics: TrainingMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub classifier_accuracy: Option<f64>,
    /// Held-out R² of the regressor, reported as the regression confidence.
    pub regressor_r2: Option<f64>,
    pub trained_at: Option<String>,
}

impl BundleMetadata {
    pub fn check_schema(&self) -> ModelResult<()> {
        matches_schema(&self.feature_names).map_err(|reason| ModelError::SchemaMismatch { reason })
    }

    /// Regression confidence on the 0–100 scale, if the bundle recorded one.
    pub fn regression_confidence(&self) -> Option<f64> {
        self.metrics
            .regressor_r2
            .filter(|r| r.is_finite())
            .map(|r| r * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylist_features::FEATURE_NAMES;

    fn metadata(names: Vec<String>) -> BundleMetadata {
        BundleMetadata {
            version: "test".into(),
            feature_names: names,
            class_mapping: BTreeMap::new(),
            target_names: vec![],
            metrics: TrainingMetrics::default(),
        }
    }

    #[test]
    fn reordered_schema_is_a_mismatch() {
        let mut names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        assert!(metadata(names.clone()).check_schema().is_ok());
        names.swap(0, 1);
        assert!(matches!(
            metadata(names).check_schema(),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn class_mapping_parses_string_keys() {
        let json = r#"{"version": "1", "feature_names": [],
            "class_mapping": {"0": ["density-compact"], "2": ["density-spacious", "layout-wide"]},
            "metrics": {"regressor_r2": 0.74}}"#;
        let meta: BundleMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.class_mapping[&2].len(), 2);
        assert!((meta.regression_confidence().unwrap() - 74.0).abs() < 1e-9);
    }
}
