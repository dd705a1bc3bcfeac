use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stylist_cache::PredictionCache;
use stylist_core::config::{CacheConfig, FeatureConfig, ModelConfig};
use stylist_core::context::{HistoricalEvent, UserContext};
use stylist_core::models::{BundleTier, HealthStatus, ModelState, PredictionRequest};
use stylist_core::traits::{IHealthReporter, IPredictor, ManualClock};
use stylist_core::StylistConfig;
use stylist_models::ModelManager;
use stylist_prediction::PredictionService;

fn config_for(dir: &Path) -> StylistConfig {
    let mut config = StylistConfig::default();
    config.models.bundle_dir = dir.display().to_string();
    config.models.retry_delay_ms = 0;
    config
}

fn service_with_clock(dir: &Path, cache: CacheConfig, clock: Arc<ManualClock>) -> PredictionService {
    let models = ModelConfig {
        bundle_dir: dir.display().to_string(),
        retry_delay_ms: 0,
        ..Default::default()
    };
    PredictionService::from_parts(
        Arc::new(ModelManager::new(models, FeatureConfig::default())),
        Arc::new(PredictionCache::with_clock(cache, clock)),
        3,
    )
}

fn desktop_dark() -> PredictionRequest {
    PredictionRequest::new(UserContext {
        prefers_color_scheme: Some("dark".into()),
        touch_capable: Some(false),
        ..UserContext::with_viewport(1920.0, 1080.0)
    })
}

#[test]
fn second_identical_request_is_served_from_cache() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));

    let first = service.predict(&desktop_dark());
    let second = service.predict(&desktop_dark());

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.tokens, second.tokens);
    assert_eq!(first.confidence, second.confidence);
    assert_ne!(first.prediction_id, second.prediction_id);
    assert_eq!(second.model_tier, BundleTier::Dual);

    let stats = service.cache().stats();
    assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
}

#[test]
fn desktop_dark_scenario_through_service() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    let response = service.predict(&desktop_dark());

    let breakdown = &response.confidence.breakdown;
    assert!((0.0..=100.0).contains(&breakdown.classification.unwrap()));
    assert!((0.0..=100.0).contains(&breakdown.regression.unwrap()));
    assert_eq!(response.tokens.css_variables["--font-size-base"], "1.05rem");
    assert!(response.processing_time_ms >= 0.0);
}

#[test]
fn authentication_splits_cache_entries() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    service.predict(&desktop_dark());
    let authed = service.predict(&desktop_dark().authenticated(true));
    assert!(!authed.cached);
    assert_eq!(service.cache().len(), 2);
}

#[test]
fn history_does_not_change_the_fingerprint() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    service.predict(&desktop_dark());
    let returning =
        desktop_dark().with_history(vec![HistoricalEvent::new(600.0, 40.0, 0.0)]);
    assert!(service.predict(&returning).cached);
}

#[test]
fn cached_prediction_expires_with_its_ttl() {
    let dir = stylist_fixtures::dual_bundle();
    let clock = Arc::new(ManualClock::new());
    let service = service_with_clock(dir.path(), CacheConfig::default(), clock.clone());

    let first = service.predict(&desktop_dark());
    let ttl = service.ttl_policy().ttl_for(&first.confidence);
    clock.advance(ttl - Duration::from_secs(1));
    assert!(service.predict(&desktop_dark()).cached);

    clock.advance(Duration::from_secs(2));
    assert!(!service.predict(&desktop_dark()).cached);
}

#[test]
fn oversized_tokens_are_served_but_not_cached() {
    let dir = stylist_fixtures::dual_bundle();
    let cache = CacheConfig {
        max_entry_bytes: 8,
        ..Default::default()
    };
    let service = service_with_clock(dir.path(), cache, Arc::new(ManualClock::new()));
    let first = service.predict(&desktop_dark());
    let second = service.predict(&desktop_dark());
    assert!(first.tokens.is_valid());
    assert!(!second.cached);
    assert!(service.cache().is_empty());
}

#[test]
fn missing_model_directory_still_serves() {
    let dir = tempfile::tempdir().unwrap();
    let service = PredictionService::new(&config_for(&dir.path().join("nope")));

    let response = service.predict(&desktop_dark());
    assert!(response.tokens.is_valid());
    assert!(response.confidence.is_fallback());
    assert_eq!(response.model_tier, BundleTier::Emergency);

    let health = service.health().unwrap();
    assert_eq!(health.model.overall_status, ModelState::Degraded);
    assert_eq!(health.model.overall_status.as_str(), "degraded");
    assert_eq!(health.report.overall_status, HealthStatus::Degraded);
    assert_eq!(health.report.metrics.active_degradations, 3);
}

#[test]
fn healthy_bundle_reports_healthy() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    service.warm_up();
    let report = service.report().unwrap();
    assert_eq!(report.overall_status, HealthStatus::Healthy);
    assert_eq!(report.metrics.model_tier, Some(BundleTier::Dual));
}

#[test]
fn clear_cache_forces_fresh_inference() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    service.predict(&desktop_dark());
    service.clear_cache();
    assert!(!service.predict(&desktop_dark()).cached);
}

#[test]
fn batch_preserves_order() {
    let dir = stylist_fixtures::dual_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    let phone = PredictionRequest::new(UserContext::with_viewport(375.0, 812.0));
    let requests = vec![desktop_dark(), phone.clone(), desktop_dark(), phone];

    let responses = service.predict_batch(&requests);
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0].tokens, responses[2].tokens);
    assert_eq!(responses[1].tokens, responses[3].tokens);
    assert_ne!(responses[0].tokens, responses[1].tokens);
    assert!(responses.iter().all(|r| r.tokens.is_valid()));
}

#[test]
fn recover_clears_cache_and_resolves_degradations() {
    let dir = stylist_fixtures::empty_output_bundle();
    let service = PredictionService::new(&config_for(dir.path()));
    service.predict(&desktop_dark());
    assert_eq!(service.model_health().overall_status, ModelState::Partial);
    assert_eq!(service.health().unwrap().report.metrics.active_degradations, 1);

    stylist_fixtures::write_dual_bundle(dir.path());
    let report = service.recover();
    assert_eq!(report.new_state, ModelState::Healthy);
    assert!(service.cache().is_empty());

    let health = service.health().unwrap();
    assert_eq!(health.report.overall_status, HealthStatus::Healthy);
    assert!(service.degradations().active_degradations().is_empty());
}

#[test]
fn self_test_recovers_after_failure_streak() {
    let dir = stylist_fixtures::empty_output_bundle();
    let mut config = config_for(dir.path());
    config.models.recover_after_failures = 2;
    let service = PredictionService::new(&config);
    service.warm_up();
    assert_eq!(service.models().consecutive_validation_failures(), 1);

    stylist_fixtures::write_dual_bundle(dir.path());
    let outcome = service.self_test();
    assert_eq!(outcome.validation.consecutive_failures, 2);
    assert!(outcome.recovered());
    let recovery = outcome.recovery.unwrap();
    assert_eq!(recovery.new_state, ModelState::Healthy);
    assert!(recovery.restored().contains(&"classifier"));

    let calm = service.self_test();
    assert!(calm.validation.passed());
    assert!(!calm.recovered());
}

#[test]
fn usable_through_trait_objects() {
    let dir = stylist_fixtures::dual_bundle();
    let service: Arc<dyn IPredictor> = Arc::new(PredictionService::new(&config_for(dir.path())));
    let response = service.predict(&PredictionRequest::default());
    assert!(response.tokens.is_valid());
}
