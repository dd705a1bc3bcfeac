//! Tier loading strategies.
//!
//! Each [`BundleLoader`] knows how to build one tier from a bundle directory.
//! The manager folds over an ordered list of them and keeps the first
//! success; the order is the tiering policy.

pub mod dual;
pub mod individual;
pub mod static_mapping;

use std::path::Path;

use stylist_core::config::ModelConfig;
use stylist_core::errors::ModelError;
use stylist_core::models::BundleTier;
use tracing::warn;

pub use dual::DualLoader;
pub use individual::IndividualLoader;
pub use static_mapping::{DefaultMappingLoader, EmergencyLoader};

use crate::artifacts::{read_json, read_optional_json};
use crate::bundle::LoadedBundle;
use crate::fallback::DefaultMapping;
use crate::metadata::BundleMetadata;
use crate::ModelResult;

pub const METADATA_FILE: &str = "metadata.json";
pub const DUAL_CLASSIFIER_FILE: &str = "dual_classifier.json";
pub const DUAL_REGRESSOR_FILE: &str = "dual_regressor.json";
pub const FEATURE_SCALER_FILE: &str = "feature_scaler.json";
pub const TARGET_SCALER_FILE: &str = "target_scaler.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const REGRESSOR_FILE: &str = "regressor.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const DEFAULT_MAPPING_FILE: &str = "default_mapping.json";

/// Resource limits applied to every artifact read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    pub max_artifact_bytes: u64,
}

impl From<&ModelConfig> for LoadLimits {
    fn from(config: &ModelConfig) -> Self {
        Self {
            max_artifact_bytes: config.max_artifact_bytes,
        }
    }
}

/// Result of one strategy, as data.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Box<LoadedBundle>),
    Failed { tier: BundleTier, error: ModelError },
}

/// One tier loading strategy.
pub trait BundleLoader: Send + Sync {
    fn tier(&self) -> BundleTier;

    fn load(&self, dir: &Path, limits: LoadLimits) -> ModelResult<LoadedBundle>;

    /// Run the strategy, capturing failure as a value.
    fn attempt(&self, dir: &Path, limits: LoadLimits) -> LoadOutcome {
        match self.load(dir, limits) {
            Ok(bundle) => LoadOutcome::Loaded(Box::new(bundle)),
            Err(error) => LoadOutcome::Failed {
                tier: self.tier(),
                error,
            },
        }
    }
}

/// dual → individual → default mapping → emergency.
pub fn default_loaders() -> Vec<Box<dyn BundleLoader>> {
    vec![
        Box::new(DualLoader),
        Box::new(IndividualLoader),
        Box::new(DefaultMappingLoader),
        Box::new(EmergencyLoader),
    ]
}

/// Read and schema-check `metadata.json`.
pub(crate) fn load_metadata(dir: &Path, limits: LoadLimits) -> ModelResult<BundleMetadata> {
    let metadata: BundleMetadata = read_json(&dir.join(METADATA_FILE), limits.max_artifact_bytes)?;
    metadata.check_schema()?;
    Ok(metadata)
}

/// Static tokens paired with a learned tier: the directory's default mapping
/// when it is usable, otherwise the emergency set. Never fails the tier.
pub(crate) fn load_fallback_mapping(dir: &Path, limits: LoadLimits) -> (DefaultMapping, BundleTier) {
    let path = dir.join(DEFAULT_MAPPING_FILE);
    match read_optional_json::<DefaultMapping>(&path, limits.max_artifact_bytes) {
        Ok(Some(mapping)) => match mapping.validate() {
            Ok(()) => (mapping, BundleTier::Default),
            Err(reason) => {
                warn!(path = %path.display(), reason = %reason, "default mapping unusable, using emergency tokens");
                (DefaultMapping::emergency(), BundleTier::Emergency)
            }
        },
        Ok(None) => (DefaultMapping::emergency(), BundleTier::Emergency),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "default mapping unreadable, using emergency tokens");
            (DefaultMapping::emergency(), BundleTier::Emergency)
        }
    }
}
