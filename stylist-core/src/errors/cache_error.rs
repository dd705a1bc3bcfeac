/// Prediction cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("payload of {size} bytes exceeds the {limit} byte entry ceiling")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("fingerprint failed: {reason}")]
    FingerprintFailed { reason: String },

    #[error("cache lock poisoned")]
    LockPoisoned,
}
