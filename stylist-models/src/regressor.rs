//! Style-variable head of a bundle.

use std::collections::BTreeMap;

use serde::Serialize;
use stylist_core::constants::FEATURE_COUNT;
use stylist_core::errors::ModelError;
use stylist_features::FeatureVector;

use crate::ensemble::TreeEnsemble;
use crate::transforms::StandardScaler;
use crate::variables::format_variable;
use crate::ModelResult;

/// A loaded multi-output regressor with its optional transforms.
#[derive(Debug, Clone)]
pub struct RegressorModel {
    ensemble: TreeEnsemble,
    feature_scaler: Option<StandardScaler>,
    target_scaler: Option<StandardScaler>,
    target_names: Vec<String>,
    /// Training-time goodness of fit, 0–100. Not a per-request estimate.
    confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuePrediction {
    /// `--css-name` → clamped, formatted value.
    pub variables: BTreeMap<String, String>,
    /// Target name → unclamped model output, for diagnostics.
    pub raw: BTreeMap<String, f64>,
    pub confidence: Option<f64>,
}

impl RegressorModel {
    pub fn new(
        ensemble: TreeEnsemble,
        feature_scaler: Option<StandardScaler>,
        target_scaler: Option<StandardScaler>,
        target_names: Vec<String>,
        confidence: Option<f64>,
        source: &str,
    ) -> ModelResult<Self> {
        let corrupt = |reason: String| ModelError::ArtifactCorrupt {
            path: source.to_string(),
            reason,
        };
        ensemble.validate().map_err(corrupt)?;
        if target_names.len() != ensemble.n_outputs {
            return Err(ModelError::SchemaMismatch {
                reason: format!(
                    "{source}: {} target names for {} outputs",
                    target_names.len(),
                    ensemble.n_outputs
                ),
            });
        }
        if let Some(s) = &feature_scaler {
            s.validate(FEATURE_COUNT).map_err(corrupt)?;
        }
        if let Some(s) = &target_scaler {
            s.validate(target_names.len()).map_err(corrupt)?;
        }
        Ok(Self {
            ensemble,
            feature_scaler,
            target_scaler,
            target_names,
            confidence,
        })
    }

    pub fn predict(&self, features: &FeatureVector) -> ModelResult<ValuePrediction> {
        let row = match &self.feature_scaler {
            Some(s) => s.transform(features.as_slice()),
            None => features.as_slice().to_vec(),
        };
        let margins = self.ensemble.margins(&row)?;
        let outputs = match &self.target_scaler {
            Some(s) => s.inverse_transform(&margins),
            None => margins,
        };
        if outputs.is_empty() {
            return Err(ModelError::InferenceFailed {
                reason: "regressor produced no outputs".to_string(),
            });
        }

        let mut variables = BTreeMap::new();
        let mut raw = BTreeMap::new();
        for (name, value) in self.target_names.iter().zip(outputs) {
            let (key, formatted) = format_variable(name, value);
            variables.insert(key, formatted);
            raw.insert(name.clone(), value);
        }

        Ok(ValuePrediction {
            variables,
            raw,
            confidence: self.confidence,
        })
    }

    pub fn has_feature_scaler(&self) -> bool {
        self.feature_scaler.is_some()
    }

    pub fn has_target_scaler(&self) -> bool {
        self.target_scaler.is_some()
    }

    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::{Node, Tree};
    use stylist_features::schema::slot;

    fn font_regressor() -> TreeEnsemble {
        TreeEnsemble {
            n_outputs: 2,
            base_score: vec![0.0, 0.0],
            trees: vec![
                Tree {
                    output: 0,
                    nodes: vec![
                        Node::split(slot::TOUCH, 0.5, 1, 2),
                        Node::leaf(0.0),
                        Node::leaf(0.5),
                    ],
                },
                Tree {
                    output: 1,
                    nodes: vec![Node::leaf(0.0)],
                },
            ],
        }
    }

    #[test]
    fn target_scaler_is_inverted_before_formatting() {
        let model = RegressorModel::new(
            font_regressor(),
            None,
            Some(StandardScaler {
                mean: vec![1.0, 1.5],
                scale: vec![0.25, 1.0],
            }),
            vec!["font_size_base".into(), "line_height".into()],
            Some(74.0),
            "test",
        )
        .unwrap();

        let out = model.predict(&FeatureVector::default_vector()).unwrap();
        assert_eq!(out.variables["--font-size-base"], "1rem");
        assert_eq!(out.variables["--line-height"], "1.5");
        assert_eq!(out.confidence, Some(74.0));

        let mut touch = FeatureVector::default_vector().as_slice().to_vec();
        touch[slot::TOUCH] = 1.0;
        let out = model
            .predict(&FeatureVector::try_from_slice(&touch).unwrap())
            .unwrap();
        assert_eq!(out.variables["--font-size-base"], "1.125rem");
    }

    #[test]
    fn target_count_must_match_outputs() {
        let err = RegressorModel::new(
            font_regressor(),
            None,
            None,
            vec!["font_size_base".into()],
            None,
            "test",
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch { .. }));
    }
}
