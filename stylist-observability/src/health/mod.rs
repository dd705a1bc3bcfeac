//! Health reporting for the model and cache subsystems.

pub mod reporter;
pub mod subsystem_checks;

pub use reporter::{HealthReporter, HealthSnapshot};
pub use subsystem_checks::SubsystemChecker;
