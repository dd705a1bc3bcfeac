//! # stylist-core
//!
//! Foundation crate for the stylist prediction service.
//! Defines the request context, design token output, errors, config,
//! health models, and the traits shared by every other crate in the workspace.

pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::StylistConfig;
pub use context::{HistoricalEvent, SocialAggregate, UserContext};
pub use errors::{StylistError, StylistResult};
pub use models::{Confidence, DesignTokenSet, PredictionRequest, PredictionResponse};
