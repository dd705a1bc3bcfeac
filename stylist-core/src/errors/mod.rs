//! Error handling for stylist.
//! One error enum per subsystem, `thiserror` only.

pub mod cache_error;
pub mod config_error;
pub mod feature_error;
pub mod model_error;
pub mod stylist_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use feature_error::FeatureError;
pub use model_error::ModelError;
pub use stylist_error::{StylistError, StylistResult};
