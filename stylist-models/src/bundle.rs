//! The immutable unit the manager swaps in and out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stylist_core::models::{BundleTier, ModelState};

use crate::classifier::ClassifierModel;
use crate::fallback::DefaultMapping;
use crate::metadata::BundleMetadata;
use crate::regressor::RegressorModel;

/// A fully loaded bundle. Never mutated after construction; demotion builds
/// a new bundle instead.
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub tier: BundleTier,
    pub classifier: Option<Arc<ClassifierModel>>,
    pub regressor: Option<Arc<RegressorModel>>,
    pub metadata: Option<Arc<BundleMetadata>>,
    /// Static tokens served when inference fails or no model is present.
    pub fallback: Arc<DefaultMapping>,
    /// Tier reported once no learned model remains.
    pub fallback_tier: BundleTier,
    /// Set when a self-test dropped a head from the bundle as loaded.
    pub demoted: bool,
    pub loaded_at: DateTime<Utc>,
}

/// Per-component online flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentStatus {
    pub classifier: bool,
    pub regressor: bool,
    pub feature_scaler: bool,
    pub target_scaler: bool,
    pub label_codec: bool,
}

impl LoadedBundle {
    /// A bundle with no learned models.
    pub fn static_only(tier: BundleTier, mapping: DefaultMapping) -> Self {
        Self {
            tier,
            classifier: None,
            regressor: None,
            metadata: None,
            fallback: Arc::new(mapping),
            fallback_tier: tier,
            demoted: false,
            loaded_at: Utc::now(),
        }
    }

    pub fn emergency() -> Self {
        Self::static_only(BundleTier::Emergency, DefaultMapping::emergency())
    }

    pub fn state(&self) -> ModelState {
        match (self.classifier.is_some(), self.regressor.is_some()) {
            (true, true) => ModelState::Healthy,
            (false, false) => ModelState::Degraded,
            _ => ModelState::Partial,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.metadata {
            Some(meta) => Some(meta.version.as_str()),
            None if self.fallback.version.is_empty() => None,
            None => Some(self.fallback.version.as_str()),
        }
    }

    pub fn components(&self) -> ComponentStatus {
        let classifier = self.classifier.as_deref();
        let regressor = self.regressor.as_deref();
        ComponentStatus {
            classifier: classifier.is_some(),
            regressor: regressor.is_some(),
            feature_scaler: classifier.is_some_and(|c| c.has_scaler())
                || regressor.is_some_and(|r| r.has_feature_scaler()),
            target_scaler: regressor.is_some_and(|r| r.has_target_scaler()),
            label_codec: classifier.is_some_and(|c| c.has_codec()),
        }
    }

    /// Copy of this bundle with failed heads dropped. The tier falls back to
    /// the static tier once neither head remains.
    pub fn demote(&self, keep_classifier: bool, keep_regressor: bool) -> Self {
        let classifier = self.classifier.clone().filter(|_| keep_classifier);
        let regressor = self.regressor.clone().filter(|_| keep_regressor);
        let demoted = self.demoted
            || classifier.is_some() != self.classifier.is_some()
            || regressor.is_some() != self.regressor.is_some();
        let tier = if classifier.is_none() && regressor.is_none() {
            self.fallback_tier
        } else {
            self.tier
        };
        Self {
            tier,
            classifier,
            regressor,
            metadata: self.metadata.clone(),
            fallback: Arc::clone(&self.fallback),
            fallback_tier: self.fallback_tier,
            demoted,
            loaded_at: self.loaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_bundle_is_degraded_without_components() {
        let bundle = LoadedBundle::emergency();
        assert_eq!(bundle.state(), ModelState::Degraded);
        assert_eq!(bundle.components(), ComponentStatus::default());
        assert_eq!(bundle.version(), Some("emergency"));
    }

    #[test]
    fn demoting_static_bundle_is_a_noop() {
        let bundle = LoadedBundle::emergency();
        let demoted = bundle.demote(false, false);
        assert_eq!(demoted.tier, BundleTier::Emergency);
        assert_eq!(demoted.state(), ModelState::Degraded);
        assert!(!demoted.demoted);
    }
}
