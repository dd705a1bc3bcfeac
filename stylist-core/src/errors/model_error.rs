/// Model bundle and inference errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("artifact read failed: {path}: {reason}")]
    ArtifactIo { path: String, reason: String },

    #[error("artifact corrupt: {path}: {reason}")]
    ArtifactCorrupt { path: String, reason: String },

    #[error("artifact too large: {path}: {size} bytes exceeds {limit}")]
    ArtifactTooLarge { path: String, size: u64, limit: u64 },

    #[error("schema mismatch: {reason}")]
    SchemaMismatch { reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("model unavailable: {component}")]
    ModelUnavailable { component: String },

    #[error("tier {tier} unavailable: {reason}")]
    TierUnavailable { tier: String, reason: String },
}

impl ModelError {
    /// Whether retrying the same load could plausibly succeed.
    ///
    /// Missing and corrupt artifacts stay missing and corrupt; only I/O
    /// failures on files that exist are considered transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ArtifactIo { .. })
    }
}
