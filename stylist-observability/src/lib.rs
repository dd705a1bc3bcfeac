//! # stylist-observability
//!
//! Structured tracing with span definitions and event helpers, degradation
//! event tracking, and health report assembly for the model and cache
//! subsystems.

pub mod degradation;
pub mod health;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use health::{HealthReporter, HealthSnapshot, SubsystemChecker};
