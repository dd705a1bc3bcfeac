use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use stylist_core::config::{FeatureConfig, ModelConfig};
use stylist_core::context::{HistoricalEvent, SocialAggregate, UserContext};
use stylist_core::models::{BundleTier, ConfidenceQuality, ModelState};
use stylist_fixtures::IndividualParts;
use stylist_models::{ComponentCheck, ModelManager};

fn manager_for(dir: &Path) -> ModelManager {
    let config = ModelConfig {
        bundle_dir: dir.display().to_string(),
        retry_delay_ms: 0,
        ..Default::default()
    };
    ModelManager::new(config, FeatureConfig::default())
}

fn desktop_dark() -> UserContext {
    UserContext {
        prefers_color_scheme: Some("dark".into()),
        touch_capable: Some(false),
        ..UserContext::with_viewport(1920.0, 1080.0)
    }
}

#[test]
fn dual_bundle_loads_healthy() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    let report = manager.load(3, Duration::ZERO);

    assert_eq!(report.tier, BundleTier::Dual);
    assert_eq!(report.state, ModelState::Healthy);
    assert!(report.failures.is_empty());
    assert!(report.validation.passed());

    let health = manager.health();
    assert_eq!(health.overall_status, ModelState::Healthy);
    assert!(health.classifier_online && health.regressor_online);
    assert!(health.feature_scaler_online && health.target_scaler_online);
    assert!(health.label_codec_online);
    assert_eq!(
        health.bundle_version.as_deref(),
        Some(stylist_fixtures::BUNDLE_VERSION)
    );
}

#[test]
fn desktop_dark_scenario() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);

    let prediction = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let breakdown = &prediction.confidence.breakdown;
    let classification = breakdown.classification.unwrap();
    let regression = breakdown.regression.unwrap();
    assert!((0.0..=100.0).contains(&classification));
    assert!((0.0..=100.0).contains(&regression));
    assert!((regression - stylist_fixtures::REGRESSOR_R2 * 100.0).abs() < 1e-9);

    let font = &prediction.tokens.css_variables["--font-size-base"];
    assert!(font.ends_with("rem"), "unexpected font size {font}");
    assert_eq!(font, "1.05rem");
    assert_eq!(prediction.tokens.css_variables["--content-max-width"], "1400px");
    assert!(prediction
        .tokens
        .css_classes
        .contains(&"density-spacious".to_string()));
    assert_eq!(prediction.tier, BundleTier::Dual);
}

#[test]
fn viewport_width_changes_density_tokens() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);

    let phone = UserContext {
        viewport_width: Some(375.0),
        ..desktop_dark()
    };
    let wide = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let narrow = manager.predict_dual(Some(&phone), &[], &SocialAggregate::new(), false);
    assert_ne!(wide.tokens.css_classes, narrow.tokens.css_classes);
    assert!(narrow
        .tokens
        .css_classes
        .contains(&"density-compact".to_string()));
}

#[test]
fn identical_input_yields_identical_tokens() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);

    let history = vec![HistoricalEvent::new(300.0, 25.0, 1.0)];
    let social = SocialAggregate::new().with("dark_mode_percentage", 62.0);
    let a = manager.predict_dual(Some(&desktop_dark()), &history, &social, true);
    let b = manager.predict_dual(Some(&desktop_dark()), &history, &social, true);
    assert_eq!(a, b);
}

#[test]
fn missing_directory_degrades_and_still_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_for(&dir.path().join("does-not-exist"));
    let report = manager.load(2, Duration::ZERO);

    assert_eq!(report.tier, BundleTier::Emergency);
    assert_eq!(report.attempts, 1);
    assert_eq!(manager.health().overall_status, ModelState::Degraded);
    assert_eq!(manager.health().overall_status.as_str(), "degraded");

    let prediction = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    assert!(!prediction.tokens.css_classes.is_empty());
    assert!(!prediction.tokens.css_variables.is_empty());
    assert!(prediction.confidence.is_fallback());
    assert!((0.0..=100.0).contains(&prediction.confidence.score));
}

#[test]
fn empty_directory_uses_emergency_tier() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);
    assert_eq!(manager.tier(), Some(BundleTier::Emergency));
    let events = manager.drain_degradation_events();
    let components: Vec<&str> = events.iter().map(|e| e.component.as_str()).collect();
    assert_eq!(components, vec!["bundle.dual", "bundle.individual", "bundle.default"]);
}

#[test]
fn corrupt_dual_falls_to_default_mapping() {
    let dir = stylist_fixtures::corrupt_dual_bundle();
    let manager = manager_for(dir.path());
    let report = manager.load(3, Duration::ZERO);

    assert_eq!(report.tier, BundleTier::Default);
    assert_eq!(report.state, ModelState::Degraded);
    assert_eq!(report.attempts, 1, "corrupt files are not retried");
    assert!(report.failures[0].error.contains("corrupt"));

    let prediction = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    assert_eq!(prediction.confidence.quality, ConfidenceQuality::Fallback);
    assert!(prediction.tokens.css_classes.contains(&"theme-dark".to_string()));
    assert_eq!(prediction.tokens.css_variables["--content-max-width"], "1400px");
}

#[test]
fn schema_mismatch_is_a_tier_failure() {
    let dir = stylist_fixtures::schema_mismatch_bundle();
    let manager = manager_for(dir.path());
    let report = manager.load(0, Duration::ZERO);
    assert_eq!(report.tier, BundleTier::Default);
    assert!(report.failures[0].error.contains("schema mismatch"));
}

#[test]
fn oversized_artifacts_are_rejected() {
    let dir = stylist_fixtures::dual_bundle();
    let config = ModelConfig {
        bundle_dir: dir.path().display().to_string(),
        max_artifact_bytes: 64,
        ..Default::default()
    };
    let manager = ModelManager::new(config, FeatureConfig::default());
    let report = manager.load(0, Duration::ZERO);
    assert_eq!(report.tier, BundleTier::Emergency);
    assert!(report.failures[0].error.contains("too large"));
}

#[test]
fn individual_classifier_only_is_partial() {
    let dir = stylist_fixtures::individual_bundle(IndividualParts {
        classifier: true,
        regressor: false,
    });
    let manager = manager_for(dir.path());
    let report = manager.load(0, Duration::ZERO);
    assert_eq!(report.tier, BundleTier::Individual);
    assert_eq!(report.state, ModelState::Partial);

    let prediction = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    // Variables come from the default mapping, classes from the classifier.
    assert_eq!(prediction.tokens.css_variables["--font-size-base"], "1rem");
    assert!(prediction
        .tokens
        .css_classes
        .contains(&"layout-wide".to_string()));
    assert!(prediction.confidence.breakdown.regression.is_none());
    assert!(prediction.confidence.breakdown.classification.is_some());
}

#[test]
fn individual_regressor_only_is_partial() {
    let dir = stylist_fixtures::individual_bundle(IndividualParts {
        classifier: false,
        regressor: true,
    });
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);
    assert_eq!(manager.state(), ModelState::Partial);

    let health = manager.health();
    assert!(!health.classifier_online && health.regressor_online);
    assert!(health.feature_scaler_online);

    let prediction = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    assert_eq!(prediction.tokens.css_variables["--font-size-base"], "1.05rem");
    assert!(prediction.tokens.css_classes.contains(&"stylist".to_string()));
}

#[test]
fn failed_self_test_demotes_classifier() {
    let dir = stylist_fixtures::empty_output_bundle();
    let manager = manager_for(dir.path());
    let report = manager.load(0, Duration::ZERO);

    assert!(matches!(
        report.validation.classifier,
        ComponentCheck::Failed { .. }
    ));
    assert_eq!(report.validation.demoted, vec!["classifier".to_string()]);
    assert_eq!(report.state, ModelState::Partial);
    assert!(!manager.health().classifier_online);
    assert_eq!(manager.consecutive_validation_failures(), 1);

    // Still demoted on the next run, so the failure streak grows.
    let again = manager.validate();
    assert!(!again.passed());
    assert!(again.running_demoted);
    assert_eq!(again.consecutive_failures, 2);
}

#[test]
fn recover_restores_components_after_repair() {
    let dir = stylist_fixtures::empty_output_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);
    assert_eq!(manager.state(), ModelState::Partial);

    stylist_fixtures::write_dual_bundle(dir.path());
    let report = manager.recover();

    assert_eq!(report.previous_state, ModelState::Partial);
    assert_eq!(report.new_state, ModelState::Healthy);
    assert_eq!(report.restored(), vec!["classifier", "label_codec"]);
    assert_eq!(report.components.len(), 5);
    assert_eq!(manager.consecutive_validation_failures(), 0);
}

#[test]
fn recover_without_changes_reports_same_state() {
    let dir = stylist_fixtures::default_only_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);
    let report = manager.recover();
    assert_eq!(report.previous_state, ModelState::Degraded);
    assert_eq!(report.new_state, ModelState::Degraded);
    assert_eq!(report.new_tier, Some(BundleTier::Default));
    assert!(report.restored().is_empty());
}

#[test]
fn ensure_loaded_runs_once() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    assert!(manager.ensure_loaded().is_some());
    assert!(manager.ensure_loaded().is_none());
    assert!(manager.is_loaded());
}

#[test]
fn concurrent_reads_during_recovery_see_whole_bundles() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = Arc::new(manager_for(dir.path()));
    manager.load(0, Duration::ZERO);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let p = manager.predict_dual(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
                    assert!(p.tokens.is_valid());
                    assert_eq!(p.tier, BundleTier::Dual);
                    assert!(!p.confidence.is_fallback());
                }
            })
        })
        .collect();
    for _ in 0..5 {
        manager.recover();
    }
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn predict_heads_directly() {
    let dir = stylist_fixtures::dual_bundle();
    let manager = manager_for(dir.path());
    manager.load(0, Duration::ZERO);

    let features = manager.feature_processor().build(
        Some(&desktop_dark()),
        &[],
        &SocialAggregate::new(),
        false,
    );
    let classes = manager.predict_classes(&features).unwrap();
    assert_eq!(classes.label.as_deref(), Some("spacious"));
    let values = manager.predict_values(&features).unwrap();
    assert_eq!(values.variables["--touch-target-size"], "44px");
    assert_eq!(values.variables.len(), stylist_fixtures::TARGET_NAMES.len());
}
