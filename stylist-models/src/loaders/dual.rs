//! Dual tier: jointly trained classifier and regressor.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use stylist_core::models::BundleTier;

use super::{
    load_fallback_mapping, load_metadata, BundleLoader, LoadLimits, DUAL_CLASSIFIER_FILE,
    DUAL_REGRESSOR_FILE, FEATURE_SCALER_FILE, LABEL_ENCODER_FILE, TARGET_SCALER_FILE,
};
use crate::artifacts::{read_json, read_optional_json};
use crate::bundle::LoadedBundle;
use crate::classifier::ClassifierModel;
use crate::ensemble::TreeEnsemble;
use crate::regressor::RegressorModel;
use crate::transforms::{LabelCodec, StandardScaler};
use crate::ModelResult;

/// Requires metadata, both models, and the label codec. Scalers are optional
/// but must be valid when present.
pub struct DualLoader;

impl BundleLoader for DualLoader {
    fn tier(&self) -> BundleTier {
        BundleTier::Dual
    }

    fn load(&self, dir: &Path, limits: LoadLimits) -> ModelResult<LoadedBundle> {
        let max = limits.max_artifact_bytes;
        let metadata = load_metadata(dir, limits)?;

        let classifier_path = dir.join(DUAL_CLASSIFIER_FILE);
        let regressor_path = dir.join(DUAL_REGRESSOR_FILE);
        let classifier: TreeEnsemble = read_json(&classifier_path, max)?;
        let regressor: TreeEnsemble = read_json(&regressor_path, max)?;
        let codec: LabelCodec = read_json(&dir.join(LABEL_ENCODER_FILE), max)?;
        let feature_scaler: Option<StandardScaler> =
            read_optional_json(&dir.join(FEATURE_SCALER_FILE), max)?;
        let target_scaler: Option<StandardScaler> =
            read_optional_json(&dir.join(TARGET_SCALER_FILE), max)?;

        let classifier = ClassifierModel::new(
            classifier,
            feature_scaler.clone(),
            Some(codec),
            metadata.class_mapping.clone(),
            &classifier_path.display().to_string(),
        )?;
        let regressor = RegressorModel::new(
            regressor,
            feature_scaler,
            target_scaler,
            metadata.target_names.clone(),
            metadata.regression_confidence(),
            &regressor_path.display().to_string(),
        )?;

        let (fallback, fallback_tier) = load_fallback_mapping(dir, limits);
        Ok(LoadedBundle {
            tier: BundleTier::Dual,
            classifier: Some(Arc::new(classifier)),
            regressor: Some(Arc::new(regressor)),
            metadata: Some(Arc::new(metadata)),
            fallback: Arc::new(fallback),
            fallback_tier,
            demoted: false,
            loaded_at: Utc::now(),
        })
    }
}
