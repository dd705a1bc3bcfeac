//! Aggregate health report generation.

use stylist_core::errors::StylistResult;
use stylist_core::models::{HealthMetrics, HealthReport, HealthStatus, ModelHealth, SubsystemHealth};

use super::subsystem_checks::SubsystemChecker;

/// Snapshot of subsystem data used to build a health report.
#[derive(Debug, Clone)]
pub struct HealthSnapshot {
    pub model: ModelHealth,
    pub cache_entries: usize,
    pub cache_bytes: usize,
    pub cache_hit_rate: f64,
    pub cache_lookups: u64,
    /// Set when the cache stats came from counters only (lock contended).
    pub cache_partial: bool,
    pub active_degradations: usize,
}

/// Builds a [`HealthReport`] from a snapshot and subsystem checks.
pub struct HealthReporter;

impl HealthReporter {
    pub fn build(snapshot: &HealthSnapshot) -> StylistResult<HealthReport> {
        let subsystems = SubsystemChecker::check_all(snapshot);
        let overall_status = Self::derive_overall(&subsystems);

        Ok(HealthReport {
            overall_status,
            subsystems,
            metrics: HealthMetrics {
                model_state: snapshot.model.overall_status,
                model_tier: snapshot.model.tier,
                cache_entries: snapshot.cache_entries,
                cache_bytes: snapshot.cache_bytes,
                cache_hit_rate: snapshot.cache_hit_rate,
                active_degradations: snapshot.active_degradations,
            },
        })
    }

    /// Unhealthy if any subsystem is unhealthy, degraded if any is degraded.
    fn derive_overall(subsystems: &[SubsystemHealth]) -> HealthStatus {
        let mut worst = HealthStatus::Healthy;
        for s in subsystems {
            match s.status {
                HealthStatus::Unhealthy => return HealthStatus::Unhealthy,
                HealthStatus::Degraded => worst = HealthStatus::Degraded,
                HealthStatus::Healthy => {}
            }
        }
        worst
    }
}
