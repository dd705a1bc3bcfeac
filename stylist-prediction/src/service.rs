//! PredictionService: cache first, then dual inference, then cache write.
//!
//! Implements `IPredictor` and `IHealthReporter` from stylist-core.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use stylist_cache::{CachedPrediction, PredictionCache};
use stylist_core::errors::StylistResult;
use stylist_core::models::{
    BundleTier, Confidence, DesignTokenSet, HealthReport, ModelHealth, PredictionRequest,
    PredictionResponse,
};
use stylist_core::traits::{IHealthReporter, IPredictor};
use stylist_core::StylistConfig;
use stylist_models::{ModelManager, RecoveryReport, ValidationReport};
use stylist_observability::tracing_setup::events;
use stylist_observability::{DegradationTracker, HealthReporter, HealthSnapshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::health::{SelfTestReport, ServiceHealth};
use crate::ttl_policy::TtlPolicy;

/// The public prediction entry point. Share by `Arc`.
pub struct PredictionService {
    models: Arc<ModelManager>,
    cache: Arc<PredictionCache>,
    ttl: TtlPolicy,
    recover_after_failures: u32,
    tracker: Mutex<DegradationTracker>,
}

impl PredictionService {
    /// Build the manager and cache from configuration. Nothing is loaded
    /// until the first prediction or an explicit [`warm_up`](Self::warm_up).
    pub fn new(config: &StylistConfig) -> Self {
        let models = Arc::new(ModelManager::new(
            config.models.clone(),
            config.features.clone(),
        ));
        let cache = Arc::new(PredictionCache::new(config.cache.clone()));
        Self::from_parts(models, cache, config.models.recover_after_failures)
    }

    pub fn from_parts(
        models: Arc<ModelManager>,
        cache: Arc<PredictionCache>,
        recover_after_failures: u32,
    ) -> Self {
        Self {
            ttl: TtlPolicy::from(cache.config()),
            models,
            cache,
            recover_after_failures,
            tracker: Mutex::new(DegradationTracker::new()),
        }
    }

    pub fn models(&self) -> &Arc<ModelManager> {
        &self.models
    }

    pub fn cache(&self) -> &Arc<PredictionCache> {
        &self.cache
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    /// Load the bundle now instead of on the first request.
    pub fn warm_up(&self) {
        if let Some(report) = self.models.ensure_loaded() {
            info!(
                tier = %report.tier,
                state = %report.state,
                attempts = report.attempts,
                "prediction service warmed up"
            );
            self.settle_degradations();
        }
    }

    /// Serve one request. Always returns a structurally valid token set.
    pub fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        let started = Instant::now();
        self.warm_up();

        let key = stylist_cache::key(
            request.context.as_ref(),
            request.authenticated,
            &request.extra,
        );
        if let Some(hit) = self.cache.get(&key) {
            return respond(hit.tokens, hit.confidence, hit.model_tier, true, started);
        }

        let prediction = self.models.predict_dual(
            request.context.as_ref(),
            &request.history,
            &request.social,
            request.authenticated,
        );

        let ttl = self.ttl.ttl_for(&prediction.confidence);
        let payload = CachedPrediction::new(
            prediction.tokens.clone(),
            prediction.confidence.clone(),
            prediction.tier,
        );
        if let Err(e) = self.cache.put(key, payload, Some(ttl)) {
            debug!(error = %e, "prediction not cached");
        }

        respond(
            prediction.tokens,
            prediction.confidence,
            prediction.tier,
            false,
            started,
        )
    }

    /// Serve many requests in parallel. Output order matches input order.
    pub fn predict_batch(&self, requests: &[PredictionRequest]) -> Vec<PredictionResponse> {
        self.warm_up();
        requests.par_iter().map(|r| self.predict(r)).collect()
    }

    /// Model state, cache statistics, and the aggregate health report.
    pub fn health(&self) -> StylistResult<ServiceHealth> {
        self.settle_degradations();
        let model = self.models.health();
        let cache = self.cache.stats();
        let active_degradations = self.tracker().active_count();

        let report = HealthReporter::build(&HealthSnapshot {
            model: model.clone(),
            cache_entries: cache.entries,
            cache_bytes: cache.bytes,
            cache_hit_rate: cache.hit_rate,
            cache_lookups: cache.lookups(),
            cache_partial: cache.partial,
            active_degradations,
        })?;
        Ok(ServiceHealth {
            model,
            cache,
            report,
        })
    }

    pub fn model_health(&self) -> ModelHealth {
        self.models.health()
    }

    /// Manual invalidation, e.g. after swapping bundle files on disk.
    pub fn clear_cache(&self) {
        let before = self.cache.len();
        self.cache.clear();
        info!(entries = before, "prediction cache cleared");
    }

    /// Active self-test of the loaded bundle.
    pub fn validate(&self) -> ValidationReport {
        self.warm_up();
        let report = self.models.validate();
        if !report.demoted.is_empty() {
            // Cached tokens may come from a head that was just taken offline.
            self.cache.clear();
        }
        self.settle_degradations();
        report
    }

    /// Reload the bundle, then drop every cached prediction made by the
    /// previous one.
    pub fn recover(&self) -> RecoveryReport {
        let report = self.models.recover();
        self.cache.clear();
        self.settle_degradations();
        info!(
            from = %report.previous_state,
            to = %report.new_state,
            restored = ?report.restored(),
            "prediction service recovered"
        );
        report
    }

    /// Validate, and recover once the failure streak reaches the
    /// configured threshold.
    pub fn self_test(&self) -> SelfTestReport {
        let validation = self.validate();
        let threshold = self.recover_after_failures.max(1);
        let recovery = if validation.consecutive_failures >= threshold {
            warn!(
                consecutive_failures = validation.consecutive_failures,
                threshold,
                "self-test failure streak, recovering bundle"
            );
            Some(self.recover())
        } else {
            None
        };
        SelfTestReport {
            validation,
            recovery,
        }
    }

    /// Snapshot of recorded degradations, most recent last.
    pub fn degradations(&self) -> DegradationTracker {
        self.settle_degradations();
        self.tracker().clone()
    }

    /// Move the manager's pending events into the tracker and resolve the
    /// ones the current bundle no longer suffers from.
    fn settle_degradations(&self) {
        let pending = self.models.drain_degradation_events();
        let health = self.models.health();
        let mut tracker = self.tracker();
        for event in pending {
            tracker.record(event);
        }
        let resolved = tracker.resolve_for(&health);
        if resolved > 0 {
            debug!(resolved, state = %health.overall_status, "degradations resolved");
        }
    }

    fn tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn respond(
    tokens: DesignTokenSet,
    confidence: Confidence,
    model_tier: BundleTier,
    cached: bool,
    started: Instant,
) -> PredictionResponse {
    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    events::prediction_served(
        model_tier.as_str(),
        confidence.score,
        cached,
        processing_time_ms,
    );
    PredictionResponse {
        prediction_id: Uuid::new_v4().to_string(),
        tokens,
        confidence,
        processing_time_ms,
        cached,
        model_tier,
    }
}

impl IPredictor for PredictionService {
    fn predict(&self, request: &PredictionRequest) -> PredictionResponse {
        PredictionService::predict(self, request)
    }
}

impl IHealthReporter for PredictionService {
    fn report(&self) -> StylistResult<HealthReport> {
        self.health().map(|h| h.report)
    }
}
