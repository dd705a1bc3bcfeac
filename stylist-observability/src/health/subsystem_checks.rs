//! Per-subsystem health checks: models, cache, degradations.

use stylist_core::models::{HealthStatus, ModelState, SubsystemHealth};

use super::reporter::HealthSnapshot;

/// Hit rate under which a warmed-up cache is reported degraded.
const LOW_HIT_RATE: f64 = 0.10;
/// Lookups before the hit rate is considered meaningful.
const WARM_LOOKUPS: u64 = 100;

pub struct SubsystemChecker;

impl SubsystemChecker {
    pub fn check_all(snapshot: &HealthSnapshot) -> Vec<SubsystemHealth> {
        vec![
            Self::check_models(snapshot),
            Self::check_cache(snapshot),
            Self::check_degradations(snapshot),
        ]
    }

    /// Models: healthy when both heads serve, degraded on partial or static
    /// fallback, unhealthy while nothing is loaded.
    fn check_models(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let model = &snapshot.model;
        let (status, message) = match model.overall_status {
            ModelState::Healthy => (HealthStatus::Healthy, None),
            ModelState::Partial => (
                HealthStatus::Degraded,
                Some(format!(
                    "partial bundle: classifier={} regressor={}",
                    model.classifier_online, model.regressor_online
                )),
            ),
            ModelState::Degraded => (
                HealthStatus::Degraded,
                Some("serving static default tokens".to_string()),
            ),
            ModelState::Loading | ModelState::Recovering => (
                HealthStatus::Degraded,
                Some(format!("bundle {}", model.overall_status)),
            ),
            ModelState::Unloaded => (
                HealthStatus::Unhealthy,
                Some("no bundle loaded".to_string()),
            ),
        };
        SubsystemHealth {
            name: "models".into(),
            status,
            message,
        }
    }

    fn check_cache(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) =
            if snapshot.cache_lookups >= WARM_LOOKUPS && snapshot.cache_hit_rate < LOW_HIT_RATE {
                (
                    HealthStatus::Degraded,
                    Some("prediction cache hit rate below 10%".to_string()),
                )
            } else if snapshot.cache_partial {
                (
                    HealthStatus::Healthy,
                    Some("cache stats partial: lock contended".to_string()),
                )
            } else {
                (HealthStatus::Healthy, None)
            };
        SubsystemHealth {
            name: "cache".into(),
            status,
            message,
        }
    }

    fn check_degradations(snapshot: &HealthSnapshot) -> SubsystemHealth {
        let (status, message) = if snapshot.active_degradations > 0 {
            (
                HealthStatus::Degraded,
                Some(format!("{} active degradations", snapshot.active_degradations)),
            )
        } else {
            (HealthStatus::Healthy, None)
        };
        SubsystemHealth {
            name: "degradation".into(),
            status,
            message,
        }
    }
}
