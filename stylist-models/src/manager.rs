//! ModelManager: owns the active bundle and its lifecycle.
//!
//! `Unloaded → Loading → {Healthy, Partial, Degraded} → Recovering → ...`
//!
//! Predictions clone the current `Arc<LoadedBundle>` under a short read lock
//! and run without holding it. `load`, `validate`, and `recover` serialize on
//! a separate write mutex and publish a new bundle by swapping the reference.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, TryLockError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use stylist_core::config::{FeatureConfig, ModelConfig};
use stylist_core::constants::{EMERGENCY_CONFIDENCE, FALLBACK_CONFIDENCE};
use stylist_core::context::{HistoricalEvent, SocialAggregate, UserContext};
use stylist_core::errors::ModelError;
use stylist_core::models::{
    BundleTier, Confidence, DegradationEvent, DesignTokenSet, ModelHealth, ModelState,
};
use stylist_features::{FeatureProcessor, FeatureVector};
use stylist_observability::degradation::bundle_component;
use stylist_observability::tracing_setup::events;
use stylist_observability::{load_span, predict_span, recover_span, validate_span};
use tracing::{info, warn};

use crate::bundle::{ComponentStatus, LoadedBundle};
use crate::classifier::ClassPrediction;
use crate::loaders::{default_loaders, BundleLoader, LoadLimits, LoadOutcome};
use crate::regressor::ValuePrediction;
use crate::reports::{
    ComponentCheck, ComponentRecovery, DualPrediction, LoadReport, RecoveryReport, TierFailure,
    ValidationReport,
};
use crate::ModelResult;

/// Lock-free mirror of the active bundle's component flags.
#[derive(Debug, Default)]
struct ComponentFlags {
    classifier: AtomicBool,
    regressor: AtomicBool,
    feature_scaler: AtomicBool,
    target_scaler: AtomicBool,
    label_codec: AtomicBool,
    /// 0 = no bundle.
    tier: AtomicU8,
}

impl ComponentFlags {
    fn publish(&self, tier: BundleTier, status: ComponentStatus) {
        self.classifier.store(status.classifier, Ordering::Release);
        self.regressor.store(status.regressor, Ordering::Release);
        self.feature_scaler.store(status.feature_scaler, Ordering::Release);
        self.target_scaler.store(status.target_scaler, Ordering::Release);
        self.label_codec.store(status.label_codec, Ordering::Release);
        self.tier.store(tier_code(tier), Ordering::Release);
    }

    fn status(&self) -> ComponentStatus {
        ComponentStatus {
            classifier: self.classifier.load(Ordering::Acquire),
            regressor: self.regressor.load(Ordering::Acquire),
            feature_scaler: self.feature_scaler.load(Ordering::Acquire),
            target_scaler: self.target_scaler.load(Ordering::Acquire),
            label_codec: self.label_codec.load(Ordering::Acquire),
        }
    }

    fn tier(&self) -> Option<BundleTier> {
        match self.tier.load(Ordering::Acquire) {
            1 => Some(BundleTier::Dual),
            2 => Some(BundleTier::Individual),
            3 => Some(BundleTier::Default),
            4 => Some(BundleTier::Emergency),
            _ => None,
        }
    }
}

fn tier_code(tier: BundleTier) -> u8 {
    match tier {
        BundleTier::Dual => 1,
        BundleTier::Individual => 2,
        BundleTier::Default => 3,
        BundleTier::Emergency => 4,
    }
}

/// Model registry for one process. Construct once and share by `Arc`.
pub struct ModelManager {
    config: ModelConfig,
    bundle_dir: PathBuf,
    loaders: Vec<Box<dyn BundleLoader>>,
    processor: FeatureProcessor,
    bundle: RwLock<Option<Arc<LoadedBundle>>>,
    state: AtomicU8,
    flags: ComponentFlags,
    /// Serializes load / validate / recover.
    write_lock: Mutex<()>,
    validation_failures: AtomicU32,
    events: Mutex<Vec<DegradationEvent>>,
}

impl ModelManager {
    pub fn new(config: ModelConfig, features: FeatureConfig) -> Self {
        Self::with_loaders(config, features, default_loaders())
    }

    /// Manager with a custom strategy list, evaluated in order.
    pub fn with_loaders(
        config: ModelConfig,
        features: FeatureConfig,
        loaders: Vec<Box<dyn BundleLoader>>,
    ) -> Self {
        Self {
            bundle_dir: PathBuf::from(&config.bundle_dir),
            config,
            loaders,
            processor: FeatureProcessor::new(features),
            bundle: RwLock::new(None),
            state: AtomicU8::new(ModelState::Unloaded.as_u8()),
            flags: ComponentFlags::default(),
            write_lock: Mutex::new(()),
            validation_failures: AtomicU32::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ModelState {
        ModelState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn tier(&self) -> Option<BundleTier> {
        self.flags.tier()
    }

    pub fn is_loaded(&self) -> bool {
        self.state().is_serving()
    }

    pub fn bundle_dir(&self) -> &Path {
        &self.bundle_dir
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn feature_processor(&self) -> &FeatureProcessor {
        &self.processor
    }

    pub fn consecutive_validation_failures(&self) -> u32 {
        self.validation_failures.load(Ordering::Acquire)
    }

    /// The active bundle, if any. Cheap: one `Arc` clone.
    pub fn current(&self) -> Option<Arc<LoadedBundle>> {
        self.bundle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load with the configured retry policy unless a bundle is already
    /// active. Concurrent callers wait for the first load instead of
    /// starting their own.
    pub fn ensure_loaded(&self) -> Option<LoadReport> {
        if !matches!(self.state(), ModelState::Unloaded | ModelState::Loading) {
            return None;
        }
        let _guard = self.lock_writes();
        if self.state() != ModelState::Unloaded {
            return None;
        }
        Some(self.load_locked(self.config.max_retries, self.retry_delay()))
    }

    /// Run the tier pipeline, retrying the whole pipeline with a linearly
    /// growing delay while a transient failure hit a tier better than the
    /// best one loaded so far. The best bundle across attempts is kept. Never fails: with every tier gone the emergency tokens
    /// are built in-process.
    pub fn load(&self, max_retries: u32, retry_delay: Duration) -> LoadReport {
        let _guard = self.lock_writes();
        self.load_locked(max_retries, retry_delay)
    }

    fn load_locked(&self, max_retries: u32, retry_delay: Duration) -> LoadReport {
        let started = Instant::now();
        let span = load_span!(self.bundle_dir.display(), max_retries);
        let _entered = span.enter();

        if self.state() != ModelState::Recovering {
            self.set_state(ModelState::Loading);
        }
        let limits = LoadLimits::from(&self.config);

        let mut failures = Vec::new();
        let mut loaded = None;
        let mut attempts = 0;
        for attempt in 1..=max_retries.saturating_add(1) {
            attempts = attempt;
            if attempt > 1 {
                let delay = retry_delay.saturating_mul(attempt - 1);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retrying bundle load after transient failure"
                );
                std::thread::sleep(delay);
            }

            let (bundle, attempt_failures) = self.run_pipeline(limits, attempt);
            // A retry only pays off when a transient failure hit a tier
            // better than the one that loaded.
            let retry_worth = attempt_failures
                .iter()
                .any(|f| f.transient && bundle.as_ref().map_or(true, |b| f.tier < b.tier));
            failures.extend(attempt_failures);
            if let Some(bundle) = bundle {
                if loaded
                    .as_ref()
                    .map_or(true, |best: &LoadedBundle| bundle.tier < best.tier)
                {
                    loaded = Some(bundle);
                }
            }
            if !retry_worth {
                break;
            }
        }

        let bundle = loaded.unwrap_or_else(|| {
            warn!("every bundle tier failed, serving emergency tokens");
            LoadedBundle::emergency()
        });
        events::tier_loaded(bundle.tier.as_str(), bundle.version(), attempts);
        let tier = bundle.tier;
        self.install(bundle);

        let validation = self.validate_locked();
        LoadReport {
            state: self.state(),
            tier: self.tier().unwrap_or(tier),
            attempts,
            failures,
            validation,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }

    /// Fold over the strategies, stopping at the first that loads.
    fn run_pipeline(
        &self,
        limits: LoadLimits,
        attempt: u32,
    ) -> (Option<LoadedBundle>, Vec<TierFailure>) {
        let mut failures = Vec::new();
        for (i, loader) in self.loaders.iter().enumerate() {
            match loader.attempt(&self.bundle_dir, limits) {
                LoadOutcome::Loaded(bundle) => return (Some(*bundle), failures),
                LoadOutcome::Failed { tier, error } => {
                    let transient = error.is_transient();
                    let message = error.to_string();
                    events::tier_failed(tier.as_str(), &message, transient);
                    let next = self
                        .loaders
                        .get(i + 1)
                        .map(|l| l.tier().as_str())
                        .unwrap_or(BundleTier::Emergency.as_str());
                    self.push_event(DegradationEvent::now(
                        &bundle_component(tier),
                        message.clone(),
                        next,
                    ));
                    failures.push(TierFailure {
                        tier,
                        attempt,
                        error: message,
                        transient,
                    });
                }
            }
        }
        (None, failures)
    }

    /// Publish a bundle: swap the reference, then mirror its flags and state.
    fn install(&self, bundle: LoadedBundle) {
        let state = bundle.state();
        let tier = bundle.tier;
        let status = bundle.components();
        *self.bundle.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(bundle));
        self.flags.publish(tier, status);
        self.set_state(state);
    }

    /// Active self-test: run a neutral feature vector through every present
    /// model. A head that errors or returns nothing is dropped by publishing
    /// a demoted copy of the bundle.
    pub fn validate(&self) -> ValidationReport {
        let _guard = self.lock_writes();
        self.validate_locked()
    }

    fn validate_locked(&self) -> ValidationReport {
        let Some(bundle) = self.current() else {
            return ValidationReport::not_loaded(self.consecutive_validation_failures());
        };
        let span = validate_span!(bundle.tier);
        let _entered = span.enter();

        let probe = FeatureVector::default_vector();
        let classifier = match &bundle.classifier {
            None => ComponentCheck::Absent,
            Some(model) => match model.predict(&probe) {
                Ok(p) if !p.classes.is_empty() => ComponentCheck::Passed,
                Ok(_) => ComponentCheck::Failed {
                    reason: "classifier returned no classes".to_string(),
                },
                Err(e) => ComponentCheck::Failed {
                    reason: e.to_string(),
                },
            },
        };
        let regressor = match &bundle.regressor {
            None => ComponentCheck::Absent,
            Some(model) => match model.predict(&probe) {
                Ok(v) if !v.variables.is_empty() => ComponentCheck::Passed,
                Ok(_) => ComponentCheck::Failed {
                    reason: "regressor returned no variables".to_string(),
                },
                Err(e) => ComponentCheck::Failed {
                    reason: e.to_string(),
                },
            },
        };
        let fallback_tokens_valid = bundle.fallback.tokens_for(None).is_valid();

        let mut demoted = Vec::new();
        for (name, check) in [("classifier", &classifier), ("regressor", &regressor)] {
            if let ComponentCheck::Failed { reason } = check {
                events::model_demoted(name, reason);
                self.push_event(DegradationEvent::now(
                    name,
                    reason.clone(),
                    bundle.fallback_tier.as_str(),
                ));
                demoted.push(name.to_string());
            }
        }
        let running_demoted = if demoted.is_empty() {
            bundle.demoted
        } else {
            self.install(bundle.demote(!classifier.is_failed(), !regressor.is_failed()));
            true
        };

        let clean = demoted.is_empty() && !running_demoted && fallback_tokens_valid;
        let consecutive_failures = if clean {
            self.validation_failures.store(0, Ordering::Release);
            0
        } else {
            self.validation_failures.fetch_add(1, Ordering::AcqRel) + 1
        };

        let report = ValidationReport {
            state: self.state(),
            tier: self.tier(),
            classifier,
            regressor,
            fallback_tokens_valid,
            demoted,
            running_demoted,
            consecutive_failures,
        };
        info!(
            state = %report.state,
            passed = report.passed(),
            consecutive_failures,
            "bundle self-test finished"
        );
        report
    }

    pub fn predict_classes(&self, features: &FeatureVector) -> ModelResult<ClassPrediction> {
        let bundle = self.current().ok_or_else(|| unavailable("bundle"))?;
        let classifier = bundle
            .classifier
            .as_ref()
            .ok_or_else(|| unavailable("classifier"))?;
        classifier.predict(features)
    }

    pub fn predict_values(&self, features: &FeatureVector) -> ModelResult<ValuePrediction> {
        let bundle = self.current().ok_or_else(|| unavailable("bundle"))?;
        let regressor = bundle
            .regressor
            .as_ref()
            .ok_or_else(|| unavailable("regressor"))?;
        regressor.predict(features)
    }

    /// Features → both heads → tokens with a combined confidence.
    ///
    /// Never fails. Any inference error yields the bundle's static tokens at
    /// a fixed low confidence; the bundle itself is left as is.
    pub fn predict_dual(
        &self,
        context: Option<&UserContext>,
        history: &[HistoricalEvent],
        social: &SocialAggregate,
        authenticated: bool,
    ) -> DualPrediction {
        let span = predict_span!(authenticated);
        let _entered = span.enter();

        let bundle = self
            .current()
            .unwrap_or_else(|| Arc::new(LoadedBundle::emergency()));
        match self.infer(&bundle, context, history, social, authenticated) {
            Ok(prediction) => prediction,
            Err(e) => {
                events::prediction_fallback(bundle.tier.as_str(), &e.to_string());
                static_prediction(&bundle, context)
            }
        }
    }

    fn infer(
        &self,
        bundle: &LoadedBundle,
        context: Option<&UserContext>,
        history: &[HistoricalEvent],
        social: &SocialAggregate,
        authenticated: bool,
    ) -> ModelResult<DualPrediction> {
        if bundle.classifier.is_none() && bundle.regressor.is_none() {
            return Ok(static_prediction(bundle, context));
        }

        let features = self.processor.build(context, history, social, authenticated);
        let classes = bundle
            .classifier
            .as_ref()
            .map(|c| c.predict(&features))
            .transpose()?;
        let values = bundle
            .regressor
            .as_ref()
            .map(|r| r.predict(&features))
            .transpose()?;

        let fallback = bundle.fallback.tokens_for(context);
        let mut tokens = DesignTokenSet::default();
        match &classes {
            Some(p) => {
                for class in &p.classes {
                    tokens.push_class(class.as_str());
                }
            }
            None => tokens.css_classes = fallback.css_classes.clone(),
        }
        if let Some(v) = &values {
            tokens.css_variables = v.variables.clone();
        }
        tokens.fill_missing_variables(&fallback);

        if !tokens.is_valid() {
            return Err(ModelError::InferenceFailed {
                reason: "predicted token set is empty".to_string(),
            });
        }

        let confidence = Confidence::combined(
            classes.as_ref().map(|c| c.confidence),
            values.as_ref().and_then(|v| v.confidence),
            bundle.tier.as_str(),
        );
        Ok(DualPrediction {
            tokens,
            confidence,
            tier: bundle.tier,
        })
    }

    /// Reload from disk and report which components came back. The previous
    /// bundle keeps serving until the replacement is swapped in.
    pub fn recover(&self) -> RecoveryReport {
        let _guard = self.lock_writes();
        let started = Instant::now();
        let before = self.health();
        let span = recover_span!(before.overall_status);
        let _entered = span.enter();

        self.set_state(ModelState::Recovering);
        let load = self.load_locked(self.config.max_retries, self.retry_delay());
        let after = self.health();

        let component = |name, was_online, now_online| ComponentRecovery {
            name,
            was_online,
            now_online,
        };
        let components = vec![
            component("classifier", before.classifier_online, after.classifier_online),
            component("regressor", before.regressor_online, after.regressor_online),
            component(
                "feature_scaler",
                before.feature_scaler_online,
                after.feature_scaler_online,
            ),
            component(
                "target_scaler",
                before.target_scaler_online,
                after.target_scaler_online,
            ),
            component("label_codec", before.label_codec_online, after.label_codec_online),
        ];

        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        events::recovery_completed(
            before.overall_status.as_str(),
            after.overall_status.as_str(),
            duration_ms,
        );
        RecoveryReport {
            previous_state: before.overall_status,
            new_state: after.overall_status,
            previous_tier: before.tier,
            new_tier: after.tier,
            components,
            load,
            duration_ms,
        }
    }

    /// Cheap snapshot for monitoring. Never blocks: if a swap holds the
    /// bundle lock, version and load time are left out.
    pub fn health(&self) -> ModelHealth {
        let (bundle_version, loaded_at) = match self.bundle.try_read() {
            Ok(guard) => describe(guard.as_deref()),
            Err(TryLockError::Poisoned(poisoned)) => describe(poisoned.into_inner().as_deref()),
            Err(TryLockError::WouldBlock) => (None, None),
        };
        let status = self.flags.status();
        ModelHealth {
            overall_status: self.state(),
            tier: self.flags.tier(),
            classifier_online: status.classifier,
            regressor_online: status.regressor,
            feature_scaler_online: status.feature_scaler,
            target_scaler_online: status.target_scaler,
            label_codec_online: status.label_codec,
            bundle_version,
            loaded_at,
            consecutive_validation_failures: self.consecutive_validation_failures(),
        }
    }

    /// Take the degradation events recorded since the last drain.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push_event(&self, event: DegradationEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn set_state(&self, state: ModelState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.config.retry_delay_ms)
    }
}

fn unavailable(component: &str) -> ModelError {
    ModelError::ModelUnavailable {
        component: component.to_string(),
    }
}

fn describe(bundle: Option<&LoadedBundle>) -> (Option<String>, Option<DateTime<Utc>>) {
    match bundle {
        Some(b) => (b.version().map(str::to_string), Some(b.loaded_at)),
        None => (None, None),
    }
}

/// The bundle's static tokens at the fixed fallback confidence.
fn static_prediction(bundle: &LoadedBundle, context: Option<&UserContext>) -> DualPrediction {
    let score = if bundle.fallback_tier == BundleTier::Emergency {
        EMERGENCY_CONFIDENCE
    } else {
        FALLBACK_CONFIDENCE
    };
    DualPrediction {
        tokens: bundle.fallback.tokens_for(context),
        confidence: Confidence::fallback(score, bundle.fallback_tier.as_str()),
        tier: bundle.tier,
    }
}
