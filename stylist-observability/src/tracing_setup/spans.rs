//! Span definitions per operation: load, predict, validate, recover.

/// Create a bundle load span.
#[macro_export]
macro_rules! load_span {
    ($bundle_dir:expr, $max_retries:expr) => {
        tracing::info_span!("stylist.load", bundle_dir = %$bundle_dir, max_retries = $max_retries)
    };
}

/// Create a prediction span.
#[macro_export]
macro_rules! predict_span {
    ($authenticated:expr) => {
        tracing::debug_span!("stylist.predict", authenticated = $authenticated)
    };
}

/// Create a self-test span.
#[macro_export]
macro_rules! validate_span {
    ($tier:expr) => {
        tracing::info_span!("stylist.validate", tier = ?$tier)
    };
}

/// Create a recovery span.
#[macro_export]
macro_rules! recover_span {
    ($state:expr) => {
        tracing::info_span!("stylist.recover", from_state = %$state)
    };
}
