//! # stylist-prediction
//!
//! [`PredictionService`] composes the prediction cache and the model
//! manager into the public predict path, and exposes the operational
//! pass-throughs (health, validation, recovery, cache clear).

pub mod health;
pub mod service;
pub mod ttl_policy;

pub use health::{SelfTestReport, ServiceHealth};
pub use service::PredictionService;
pub use ttl_policy::TtlPolicy;
