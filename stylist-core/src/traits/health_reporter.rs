use crate::errors::StylistResult;
use crate::models::HealthReport;

/// Health reporting for operational endpoints.
pub trait IHealthReporter: Send + Sync {
    /// Generate a health report for all prediction subsystems.
    fn report(&self) -> StylistResult<HealthReport>;
}
