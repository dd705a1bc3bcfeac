//! Degradation history with per-event recovery, resolved against the
//! current model health.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stylist_core::models::{BundleTier, DegradationEvent, ModelHealth, ModelState};

use crate::tracing_setup::events;

/// Retained history. Recovered events are dropped before active ones.
const CAPACITY: usize = 512;

const TIERS_BEST_FIRST: [BundleTier; 4] = [
    BundleTier::Dual,
    BundleTier::Individual,
    BundleTier::Default,
    BundleTier::Emergency,
];

/// Component name used for a failed bundle tier, e.g. `bundle.dual`.
pub fn bundle_component(tier: BundleTier) -> String {
    format!("bundle.{tier}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovered_at: Option<DateTime<Utc>>,
}

impl TrackedDegradation {
    pub fn status(&self) -> RecoveryStatus {
        if self.recovered_at.is_some() {
            RecoveryStatus::Recovered
        } else {
            RecoveryStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.recovered_at.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    history: VecDeque<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and keep a new event as active.
    pub fn record(&mut self, event: DegradationEvent) {
        events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        if self.history.len() == CAPACITY {
            self.evict_one();
        }
        self.history.push_back(TrackedDegradation {
            event,
            recovered_at: None,
        });
    }

    /// Resolve the active events of one component. Returns how many.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        self.resolve_where(|e| e.component == component)
    }

    /// Resolve everything, e.g. after a full-fidelity reload.
    pub fn mark_all_recovered(&mut self) -> usize {
        self.resolve_where(|_| true)
    }

    /// Resolve what the current model health no longer suffers from.
    ///
    /// A healthy dual bundle clears everything. Otherwise failures of the
    /// serving tier and of every worse tier are resolved, failures of
    /// better tiers stay active, and a demoted head stays active until it
    /// is online again.
    pub fn resolve_for(&mut self, health: &ModelHealth) -> usize {
        if health.overall_status == ModelState::Healthy && health.tier == Some(BundleTier::Dual) {
            return self.mark_all_recovered();
        }
        let mut resolved = 0;
        if let Some(serving) = health.tier {
            for tier in TIERS_BEST_FIRST.into_iter().filter(|t| *t >= serving) {
                resolved += self.mark_recovered(&bundle_component(tier));
            }
        }
        if health.classifier_online {
            resolved += self.mark_recovered("classifier");
        }
        if health.regressor_online {
            resolved += self.mark_recovered("regressor");
        }
        resolved
    }

    /// Oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TrackedDegradation> {
        self.history.iter()
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.history.iter().filter(|t| t.is_active()).collect()
    }

    pub fn active_count(&self) -> usize {
        self.history.iter().filter(|t| t.is_active()).count()
    }

    /// Events of `component` recorded within `window` of now.
    pub fn count_recent(&self, component: &str, window: Duration) -> usize {
        let since = Utc::now() - window;
        self.history
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > since)
            .count()
    }

    fn resolve_where(&mut self, matches: impl Fn(&DegradationEvent) -> bool) -> usize {
        let now = Utc::now();
        let mut resolved = 0;
        for tracked in self.history.iter_mut().filter(|t| t.is_active()) {
            if matches(&tracked.event) {
                tracked.recovered_at = Some(now);
                resolved += 1;
            }
        }
        resolved
    }

    fn evict_one(&mut self) {
        match self.history.iter().position(|t| !t.is_active()) {
            Some(i) => {
                self.history.remove(i);
            }
            None => {
                self.history.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(state: ModelState, tier: BundleTier, classifier: bool, regressor: bool) -> ModelHealth {
        ModelHealth {
            overall_status: state,
            tier: Some(tier),
            classifier_online: classifier,
            regressor_online: regressor,
            feature_scaler_online: false,
            target_scaler_online: false,
            label_codec_online: classifier,
            bundle_version: None,
            loaded_at: None,
            consecutive_validation_failures: 0,
        }
    }

    #[test]
    fn record_then_recover() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("bundle.dual", "artifact not found", "individual"));
        tracker.record(DegradationEvent::now("classifier", "empty output", "default"));
        assert_eq!(tracker.active_count(), 2);

        assert_eq!(tracker.mark_recovered("classifier"), 1);
        assert_eq!(tracker.active_count(), 1);
        assert_eq!(tracker.count_recent("bundle.dual", Duration::seconds(60)), 1);

        tracker.mark_all_recovered();
        assert!(tracker.active_degradations().is_empty());
        assert!(tracker.events().all(|t| t.status() == RecoveryStatus::Recovered));
    }

    #[test]
    fn individual_tier_keeps_dual_failure_active() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now(
            &bundle_component(BundleTier::Dual),
            "missing",
            "individual",
        ));
        tracker.record(DegradationEvent::now(
            &bundle_component(BundleTier::Individual),
            "transient read error",
            "default",
        ));
        let serving = health(ModelState::Partial, BundleTier::Individual, true, false);
        assert_eq!(tracker.resolve_for(&serving), 1);
        let active: Vec<_> = tracker
            .active_degradations()
            .iter()
            .map(|t| t.event.component.clone())
            .collect();
        assert_eq!(active, vec!["bundle.dual".to_string()]);
    }

    #[test]
    fn demoted_head_stays_active_until_online() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationEvent::now("classifier", "no classes", "default"));
        tracker.resolve_for(&health(ModelState::Partial, BundleTier::Dual, false, true));
        assert_eq!(tracker.active_count(), 1);
        tracker.resolve_for(&health(ModelState::Healthy, BundleTier::Dual, true, true));
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn history_is_bounded() {
        let mut tracker = DegradationTracker::new();
        for i in 0..(CAPACITY + 40) {
            tracker.record(DegradationEvent::now("bundle.dual", format!("attempt {i}"), "default"));
            if i % 2 == 0 {
                tracker.mark_all_recovered();
            }
        }
        assert_eq!(tracker.events().count(), CAPACITY);
    }
}
