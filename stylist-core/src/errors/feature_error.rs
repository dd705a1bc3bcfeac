/// Feature construction errors.
///
/// These never leave the feature processor: each one is logged and replaced
/// by the affected group's default values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeatureError {
    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("non-finite value in slot {index} ({name})")]
    NonFinite { index: usize, name: &'static str },

    #[error("feature vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
