use super::{CacheError, ConfigError, FeatureError, ModelError};

/// Top-level error aggregating every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum StylistError {
    #[error("feature error: {0}")]
    Feature(#[from] FeatureError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type StylistResult<T> = Result<T, StylistError>;
