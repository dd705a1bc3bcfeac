//! Individual tier: separately trained models, either may be absent.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use stylist_core::errors::ModelError;
use stylist_core::models::BundleTier;
use tracing::warn;

use super::{
    load_fallback_mapping, load_metadata, BundleLoader, LoadLimits, CLASSIFIER_FILE,
    LABEL_ENCODER_FILE, REGRESSOR_FILE, SCALER_FILE,
};
use crate::artifacts::{read_json, read_optional_json};
use crate::bundle::LoadedBundle;
use crate::classifier::ClassifierModel;
use crate::ensemble::TreeEnsemble;
use crate::metadata::BundleMetadata;
use crate::regressor::RegressorModel;
use crate::transforms::{LabelCodec, StandardScaler};
use crate::ModelResult;

/// Loads whichever of `classifier.json` / `regressor.json` is usable.
/// Fails only when neither is.
pub struct IndividualLoader;

impl IndividualLoader {
    fn classifier(
        dir: &Path,
        limits: LoadLimits,
        metadata: &BundleMetadata,
        scaler: Option<StandardScaler>,
    ) -> ModelResult<ClassifierModel> {
        let path = dir.join(CLASSIFIER_FILE);
        let ensemble: TreeEnsemble = read_json(&path, limits.max_artifact_bytes)?;
        let codec: Option<LabelCodec> =
            read_optional_json(&dir.join(LABEL_ENCODER_FILE), limits.max_artifact_bytes)?;
        ClassifierModel::new(
            ensemble,
            scaler,
            codec,
            metadata.class_mapping.clone(),
            &path.display().to_string(),
        )
    }

    fn regressor(
        dir: &Path,
        limits: LoadLimits,
        metadata: &BundleMetadata,
        scaler: Option<StandardScaler>,
    ) -> ModelResult<RegressorModel> {
        let path = dir.join(REGRESSOR_FILE);
        let ensemble: TreeEnsemble = read_json(&path, limits.max_artifact_bytes)?;
        RegressorModel::new(
            ensemble,
            scaler,
            None,
            metadata.target_names.clone(),
            metadata.regression_confidence(),
            &path.display().to_string(),
        )
    }
}

impl BundleLoader for IndividualLoader {
    fn tier(&self) -> BundleTier {
        BundleTier::Individual
    }

    fn load(&self, dir: &Path, limits: LoadLimits) -> ModelResult<LoadedBundle> {
        let metadata = load_metadata(dir, limits)?;
        let scaler: Option<StandardScaler> =
            read_optional_json(&dir.join(SCALER_FILE), limits.max_artifact_bytes)?;

        let mut errors = Vec::new();
        let classifier = match Self::classifier(dir, limits, &metadata, scaler.clone()) {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                warn!(component = "classifier", error = %e, "individual classifier unavailable");
                errors.push(e);
                None
            }
        };
        let regressor = match Self::regressor(dir, limits, &metadata, scaler) {
            Ok(r) => Some(Arc::new(r)),
            Err(e) => {
                warn!(component = "regressor", error = %e, "individual regressor unavailable");
                errors.push(e);
                None
            }
        };

        if classifier.is_none() && regressor.is_none() {
            // Surface a transient failure first so the manager can retry.
            let pick = errors.iter().position(ModelError::is_transient).unwrap_or(0);
            return Err(if pick < errors.len() {
                errors.swap_remove(pick)
            } else {
                ModelError::TierUnavailable {
                    tier: BundleTier::Individual.to_string(),
                    reason: "no usable model".to_string(),
                }
            });
        }

        let (fallback, fallback_tier) = load_fallback_mapping(dir, limits);
        Ok(LoadedBundle {
            tier: BundleTier::Individual,
            classifier,
            regressor,
            metadata: Some(Arc::new(metadata)),
            fallback: Arc::new(fallback),
            fallback_tier,
            demoted: false,
            loaded_at: Utc::now(),
        })
    }
}
