//! FeatureProcessor: context + history + social priors → feature vector.

use stylist_core::config::FeatureConfig;
use stylist_core::constants::FEATURE_COUNT;
use stylist_core::context::{HistoricalEvent, SocialAggregate, UserContext};
use stylist_core::errors::FeatureError;
use tracing::{debug, warn};

use crate::groups::{derived, device, historical, preference, temporal};
use crate::history::HistorySummary;
use crate::schema::{
    DERIVED_DEFAULTS, DEVICE_DEFAULTS, NEW_USER_DEFAULTS, PREFERENCE_DEFAULTS, TEMPORAL_DEFAULTS,
};
use crate::vector::FeatureVector;

/// Pure feature builder. Holds only normalization references.
#[derive(Debug, Clone, Default)]
pub struct FeatureProcessor {
    config: FeatureConfig,
}

impl FeatureProcessor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Build the feature vector for one request. Never fails.
    ///
    /// A bad field degrades only its own group; a missing context or a
    /// non-finite result degrades the whole vector to the all-purpose default.
    /// `authenticated` is not a feature slot; it only annotates the log line.
    pub fn build(
        &self,
        context: Option<&UserContext>,
        history: &[HistoricalEvent],
        social: &SocialAggregate,
        authenticated: bool,
    ) -> FeatureVector {
        let Some(ctx) = context else {
            warn!(authenticated, "no user context, using default feature vector");
            return FeatureVector::default_vector();
        };

        let summary = HistorySummary::from_events(history);

        let mut raw = Vec::with_capacity(FEATURE_COUNT);
        raw.extend(or_default("temporal", temporal::compute(ctx.timestamp), TEMPORAL_DEFAULTS));
        raw.extend(or_default("device", device::compute(ctx, &self.config), DEVICE_DEFAULTS));
        raw.extend(or_default(
            "preference",
            preference::compute(ctx, social),
            PREFERENCE_DEFAULTS,
        ));
        raw.extend(or_default(
            "historical",
            historical::compute(&summary),
            NEW_USER_DEFAULTS,
        ));
        raw.extend(finite_or_default(
            derived::compute(ctx, &summary, &self.config),
            DERIVED_DEFAULTS,
        ));

        match FeatureVector::try_from_slice(&raw) {
            Ok(vector) => {
                debug!(
                    authenticated,
                    sessions = summary.sessions,
                    "feature vector built"
                );
                vector
            }
            Err(e) => {
                warn!(error = %e, "feature vector rejected, using default vector");
                FeatureVector::default_vector()
            }
        }
    }

    /// Same as [`build`](Self::build), paired with slot names.
    pub fn build_named(
        &self,
        context: Option<&UserContext>,
        history: &[HistoricalEvent],
        social: &SocialAggregate,
        authenticated: bool,
    ) -> Vec<(&'static str, f64)> {
        self.build(context, history, social, authenticated).named()
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }
}

fn or_default<const N: usize>(
    group: &'static str,
    result: Result<[f64; N], FeatureError>,
    defaults: [f64; N],
) -> [f64; N] {
    match result {
        Ok(values) if values.iter().all(|v| v.is_finite()) => values,
        Ok(values) => {
            warn!(group, ?values, "feature group overflowed, group defaulted");
            defaults
        }
        Err(e @ FeatureError::MissingField { .. }) => {
            debug!(group, error = %e, "feature group defaulted");
            defaults
        }
        Err(e) => {
            warn!(group, error = %e, "feature group defaulted");
            defaults
        }
    }
}

/// Derived slots default one by one; the group never fails as a whole.
fn finite_or_default<const N: usize>(mut values: [f64; N], defaults: [f64; N]) -> [f64; N] {
    for (value, default) in values.iter_mut().zip(defaults) {
        if !value.is_finite() {
            debug!(value = *value, "derived feature defaulted");
            *value = default;
        }
    }
    values
}
