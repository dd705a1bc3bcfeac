use serde::{Deserialize, Serialize};

use super::defaults;

/// Model bundle loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the versioned bundle artifacts and `metadata.json`.
    pub bundle_dir: String,
    /// Whole-pipeline retries when only transient failures occurred.
    pub max_retries: u32,
    /// Base retry delay; attempt `n` waits `n * retry_delay_ms`.
    pub retry_delay_ms: u64,
    /// Artifacts larger than this are rejected before parsing.
    pub max_artifact_bytes: u64,
    /// Consecutive failed self-tests before an automatic recovery.
    pub recover_after_failures: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            bundle_dir: defaults::DEFAULT_BUNDLE_DIR.to_string(),
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            retry_delay_ms: defaults::DEFAULT_RETRY_DELAY_MS,
            max_artifact_bytes: defaults::DEFAULT_MAX_ARTIFACT_BYTES,
            recover_after_failures: defaults::DEFAULT_RECOVER_AFTER_FAILURES,
        }
    }
}
