//! Static tiers: the directory's default mapping, then the compiled-in set.

use std::path::Path;

use stylist_core::errors::ModelError;
use stylist_core::models::BundleTier;

use super::{BundleLoader, LoadLimits, DEFAULT_MAPPING_FILE};
use crate::artifacts::read_json;
use crate::bundle::LoadedBundle;
use crate::fallback::DefaultMapping;
use crate::ModelResult;

pub struct DefaultMappingLoader;

impl BundleLoader for DefaultMappingLoader {
    fn tier(&self) -> BundleTier {
        BundleTier::Default
    }

    fn load(&self, dir: &Path, limits: LoadLimits) -> ModelResult<LoadedBundle> {
        let path = dir.join(DEFAULT_MAPPING_FILE);
        let mapping: DefaultMapping = read_json(&path, limits.max_artifact_bytes)?;
        mapping
            .validate()
            .map_err(|reason| ModelError::ArtifactCorrupt {
                path: path.display().to_string(),
                reason,
            })?;
        Ok(LoadedBundle::static_only(BundleTier::Default, mapping))
    }
}

/// Always succeeds.
pub struct EmergencyLoader;

impl BundleLoader for EmergencyLoader {
    fn tier(&self) -> BundleTier {
        BundleTier::Emergency
    }

    fn load(&self, _dir: &Path, _limits: LoadLimits) -> ModelResult<LoadedBundle> {
        Ok(LoadedBundle::emergency())
    }
}
