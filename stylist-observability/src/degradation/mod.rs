//! Degradation tracking: tier failures and demoted models.

pub mod tracker;

pub use tracker::{bundle_component, DegradationTracker, RecoveryStatus, TrackedDegradation};
