//! Style-class head of a bundle.

use std::collections::BTreeMap;

use serde::Serialize;
use stylist_core::constants::{FEATURE_COUNT, MAX_CONFIDENCE};
use stylist_core::errors::ModelError;
use stylist_features::FeatureVector;

use crate::ensemble::TreeEnsemble;
use crate::transforms::{LabelCodec, StandardScaler};
use crate::ModelResult;

/// A loaded classifier with its optional transforms.
#[derive(Debug, Clone)]
pub struct ClassifierModel {
    ensemble: TreeEnsemble,
    scaler: Option<StandardScaler>,
    codec: Option<LabelCodec>,
    class_mapping: BTreeMap<usize, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPrediction {
    pub class_index: usize,
    pub label: Option<String>,
    pub classes: Vec<String>,
    pub probabilities: Vec<f64>,
    /// Maximum class probability on the 0–100 scale.
    pub confidence: f64,
}

impl ClassifierModel {
    /// Assemble and cross-check a classifier. Every class index the model can
    /// emit must be resolvable through the mapping or the codec.
    pub fn new(
        ensemble: TreeEnsemble,
        scaler: Option<StandardScaler>,
        codec: Option<LabelCodec>,
        class_mapping: BTreeMap<usize, Vec<String>>,
        source: &str,
    ) -> ModelResult<Self> {
        let corrupt = |reason: String| ModelError::ArtifactCorrupt {
            path: source.to_string(),
            reason,
        };
        ensemble.validate().map_err(corrupt)?;
        if let Some(s) = &scaler {
            s.validate(FEATURE_COUNT).map_err(corrupt)?;
        }

        let n_classes = ensemble.n_classes();
        if let Some(c) = &codec {
            c.validate().map_err(corrupt)?;
            if c.len() != n_classes {
                return Err(ModelError::SchemaMismatch {
                    reason: format!(
                        "{source}: label codec has {} classes, model emits {n_classes}",
                        c.len()
                    ),
                });
            }
        }
        if let Some(idx) = class_mapping.keys().find(|k| **k >= n_classes) {
            return Err(ModelError::SchemaMismatch {
                reason: format!("{source}: class_mapping index {idx} >= {n_classes} classes"),
            });
        }
        if codec.is_none() && (0..n_classes).any(|i| !class_mapping.contains_key(&i)) {
            return Err(ModelError::SchemaMismatch {
                reason: format!("{source}: classes without mapping and no label codec"),
            });
        }

        Ok(Self {
            ensemble,
            scaler,
            codec,
            class_mapping,
        })
    }

    pub fn predict(&self, features: &FeatureVector) -> ModelResult<ClassPrediction> {
        let row = match &self.scaler {
            Some(s) => s.transform(features.as_slice()),
            None => features.as_slice().to_vec(),
        };
        let probabilities = self.ensemble.probabilities(&row)?;

        let (class_index, best) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .ok_or_else(|| ModelError::InferenceFailed {
                reason: "classifier produced no probabilities".to_string(),
            })?;

        let label = self
            .codec
            .as_ref()
            .and_then(|c| c.decode(class_index))
            .map(str::to_string);

        let classes = match self.class_mapping.get(&class_index) {
            Some(mapped) => mapped.clone(),
            None => label
                .as_deref()
                .map(|l| l.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        };

        Ok(ClassPrediction {
            class_index,
            label,
            classes,
            probabilities,
            confidence: (best * MAX_CONFIDENCE).clamp(0.0, MAX_CONFIDENCE),
        })
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn has_codec(&self) -> bool {
        self.codec.is_some()
    }
}
