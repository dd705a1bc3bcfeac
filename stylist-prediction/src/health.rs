use serde::Serialize;
use stylist_cache::CacheStats;
use stylist_core::models::{HealthReport, ModelHealth};
use stylist_models::{RecoveryReport, ValidationReport};

/// Everything an operational status endpoint needs.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub model: ModelHealth,
    pub cache: CacheStats,
    pub report: HealthReport,
}

/// Result of a periodic self-test.
#[derive(Debug, Clone, Serialize)]
pub struct SelfTestReport {
    pub validation: ValidationReport,
    /// Present when the failure streak triggered an automatic recovery.
    pub recovery: Option<RecoveryReport>,
}

impl SelfTestReport {
    pub fn recovered(&self) -> bool {
        self.recovery.is_some()
    }
}
