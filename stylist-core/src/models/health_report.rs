use serde::{Deserialize, Serialize};

use super::{BundleTier, ModelState};

/// Aggregate health report across the prediction subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub subsystems: Vec<SubsystemHealth>,
    pub metrics: HealthMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsystemHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub model_state: ModelState,
    pub model_tier: Option<BundleTier>,
    pub cache_entries: usize,
    pub cache_bytes: usize,
    pub cache_hit_rate: f64,
    pub active_degradations: usize,
}
