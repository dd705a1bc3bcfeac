//! Structured results of load, validate, recover, and dual prediction.

use serde::Serialize;
use stylist_core::models::{BundleTier, Confidence, DesignTokenSet, ModelState};

/// One tier that failed during a load attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierFailure {
    pub tier: BundleTier,
    pub attempt: u32,
    pub error: String,
    pub transient: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub state: ModelState,
    pub tier: BundleTier,
    pub attempts: u32,
    pub failures: Vec<TierFailure>,
    pub validation: ValidationReport,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ComponentCheck {
    Passed,
    Failed { reason: String },
    Absent,
}

impl ComponentCheck {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub state: ModelState,
    pub tier: Option<BundleTier>,
    pub classifier: ComponentCheck,
    pub regressor: ComponentCheck,
    pub fallback_tokens_valid: bool,
    /// Components taken offline by this run.
    pub demoted: Vec<String>,
    /// The active bundle is missing a head it was loaded with.
    pub running_demoted: bool,
    pub consecutive_failures: u32,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        !self.classifier.is_failed()
            && !self.regressor.is_failed()
            && !self.running_demoted
            && self.fallback_tokens_valid
    }

    pub(crate) fn not_loaded(consecutive_failures: u32) -> Self {
        Self {
            state: ModelState::Unloaded,
            tier: None,
            classifier: ComponentCheck::Absent,
            regressor: ComponentCheck::Absent,
            fallback_tokens_valid: false,
            demoted: Vec::new(),
            running_demoted: false,
            consecutive_failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRecovery {
    pub name: &'static str,
    pub was_online: bool,
    pub now_online: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryReport {
    pub previous_state: ModelState,
    pub new_state: ModelState,
    pub previous_tier: Option<BundleTier>,
    pub new_tier: Option<BundleTier>,
    pub components: Vec<ComponentRecovery>,
    pub load: LoadReport,
    pub duration_ms: f64,
}

impl RecoveryReport {
    /// Components that were offline before and are online now.
    pub fn restored(&self) -> Vec<&'static str> {
        self.components
            .iter()
            .filter(|c| !c.was_online && c.now_online)
            .map(|c| c.name)
            .collect()
    }
}

/// Output of `ModelManager::predict_dual`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualPrediction {
    pub tokens: DesignTokenSet,
    pub confidence: Confidence,
    pub tier: BundleTier,
}
