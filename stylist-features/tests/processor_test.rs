use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use stylist_core::constants::{FEATURE_CLAMP, FEATURE_COUNT};
use stylist_core::context::{HistoricalEvent, SocialAggregate, UserContext};
use stylist_features::schema::{
    slot, DEFAULT_FEATURES, DEVICE_DEFAULTS, NEW_USER_DEFAULTS, TEMPORAL_DEFAULTS,
};
use stylist_features::{FeatureProcessor, FEATURE_NAMES};

fn desktop_dark() -> UserContext {
    UserContext {
        timestamp: Some(Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap()),
        prefers_color_scheme: Some("dark".into()),
        viewport_width: Some(1920.0),
        viewport_height: Some(1080.0),
        touch_capable: Some(false),
        pixel_ratio: Some(1.0),
        user_agent: Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()),
        ..Default::default()
    }
}

fn assert_valid(values: &[f64]) {
    assert_eq!(values.len(), FEATURE_COUNT);
    for (i, v) in values.iter().enumerate() {
        assert!(v.is_finite(), "slot {i} ({}) not finite", FEATURE_NAMES[i]);
        assert!(
            (-FEATURE_CLAMP..=FEATURE_CLAMP).contains(v),
            "slot {i} out of range: {v}"
        );
    }
}

#[test]
fn desktop_dark_context_builds_full_vector() {
    let processor = FeatureProcessor::default();
    let v = processor.build(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    assert_valid(v.as_slice());
    assert_eq!(v.get(slot::PREFERS_DARK), Some(1.0));
    assert_eq!(v.get(slot::TOUCH), Some(0.0));
    // Empty history substitutes the new-user defaults verbatim.
    assert_eq!(
        &v.as_slice()[slot::AVG_SESSION_DURATION..=slot::ENGAGEMENT],
        &NEW_USER_DEFAULTS
    );
}

#[test]
fn viewport_width_moves_density_slot() {
    let processor = FeatureProcessor::default();
    let wide = processor.build(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let narrow_ctx = UserContext {
        viewport_width: Some(375.0),
        ..desktop_dark()
    };
    let narrow = processor.build(Some(&narrow_ctx), &[], &SocialAggregate::new(), false);

    let wide_tier = wide.get(slot::DENSITY_TIER).unwrap();
    let narrow_tier = narrow.get(slot::DENSITY_TIER).unwrap();
    assert!((wide_tier - narrow_tier).abs() >= 0.5);
}

#[test]
fn malformed_timestamp_only_touches_temporal_group() {
    let processor = FeatureProcessor::default();
    let full = processor.build(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let no_time = UserContext {
        timestamp: None,
        ..desktop_dark()
    };
    let partial = processor.build(Some(&no_time), &[], &SocialAggregate::new(), false);

    assert_eq!(&partial.as_slice()[..4], &TEMPORAL_DEFAULTS);
    assert_eq!(&partial.as_slice()[4..], &full.as_slice()[4..]);
}

#[test]
fn garbage_history_degrades_to_new_user_defaults() {
    let history: Vec<HistoricalEvent> = serde_json::from_str(
        r#"[{"duration": "soon", "interaction_count": -4, "error_count": "many"}]"#,
    )
    .unwrap();
    let v = FeatureProcessor::default().build(
        Some(&desktop_dark()),
        &history,
        &SocialAggregate::new(),
        true,
    );
    assert_valid(v.as_slice());
    assert_eq!(
        &v.as_slice()[slot::AVG_SESSION_DURATION..=slot::ENGAGEMENT],
        &NEW_USER_DEFAULTS
    );
}

#[test]
fn extreme_inputs_are_clamped() {
    let ctx = UserContext {
        viewport_width: Some(1e12),
        viewport_height: Some(1.0),
        pixel_ratio: Some(1e9),
        ..desktop_dark()
    };
    let history = vec![HistoricalEvent::new(1e-9, 1e15, 0.0)];
    let v = FeatureProcessor::default().build(Some(&ctx), &history, &SocialAggregate::new(), false);
    assert_valid(v.as_slice());
    assert_eq!(v.get(slot::VIEWPORT_WIDTH), Some(FEATURE_CLAMP));
}

#[test]
fn identical_input_is_deterministic() {
    let processor = FeatureProcessor::default();
    let history = vec![HistoricalEvent::new(240.0, 18.0, 1.0)];
    let social = SocialAggregate::new().with("dark_mode_percentage", 55.0);
    let a = processor.build(Some(&desktop_dark()), &history, &social, true);
    let b = processor.build(Some(&desktop_dark()), &history, &social, true);
    assert_eq!(a, b);
}

#[test]
fn named_output_follows_schema_order() {
    let named = FeatureProcessor::default().build_named(None, &[], &SocialAggregate::new(), false);
    let names: Vec<&str> = named.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, FEATURE_NAMES.to_vec());
    let values: Vec<f64> = named.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, DEFAULT_FEATURES.to_vec());
}

#[test]
fn astronomical_viewport_leaves_other_groups_intact() {
    let processor = FeatureProcessor::default();
    let baseline = processor.build(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let huge = UserContext {
        viewport_width: Some(1e200),
        viewport_height: Some(1e200),
        ..desktop_dark()
    };
    let v = processor.build(Some(&huge), &[], &SocialAggregate::new(), false);

    assert_valid(v.as_slice());
    assert_ne!(v.as_slice(), &DEFAULT_FEATURES);
    assert_ne!(&v.as_slice()[slot::VIEWPORT_WIDTH..=slot::TOUCH], &DEVICE_DEFAULTS);
    assert_eq!(v.get(slot::PREFERS_DARK), Some(1.0));
    assert_eq!(
        &v.as_slice()[..slot::VIEWPORT_WIDTH],
        &baseline.as_slice()[..slot::VIEWPORT_WIDTH]
    );
    assert_eq!(
        &v.as_slice()[slot::AVG_SESSION_DURATION..=slot::ENGAGEMENT],
        &NEW_USER_DEFAULTS
    );
}

#[test]
fn overflowing_history_totals_keep_the_rest_of_the_vector() {
    let processor = FeatureProcessor::default();
    let baseline = processor.build(Some(&desktop_dark()), &[], &SocialAggregate::new(), false);
    let history = vec![
        HistoricalEvent::new(1e308, 5.0, 0.0),
        HistoricalEvent::new(1e308, 5.0, 0.0),
    ];
    let v = processor.build(Some(&desktop_dark()), &history, &SocialAggregate::new(), false);

    assert_valid(v.as_slice());
    assert_ne!(v.as_slice(), &DEFAULT_FEATURES);
    assert_eq!(v.get(slot::PREFERS_DARK), Some(1.0));
    assert_eq!(
        &v.as_slice()[..=slot::PREFERS_DARK],
        &baseline.as_slice()[..=slot::PREFERS_DARK]
    );
}

fn any_f64() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        Just(None),
        Just(Some(f64::NAN)),
        Just(Some(f64::INFINITY)),
        Just(Some(f64::NEG_INFINITY)),
        any::<f64>().prop_map(Some),
        (0.0f64..5000.0).prop_map(Some),
    ]
}

proptest! {
    #[test]
    fn any_context_yields_bounded_vector(
        width in any_f64(),
        height in any_f64(),
        ratio in any_f64(),
        touch in proptest::option::of(any::<bool>()),
        scheme in proptest::option::of(".{0,12}"),
        duration in any_f64(),
        interactions in any_f64(),
        errors in any_f64(),
        scroll in any_f64(),
        dark_pct in any::<f64>(),
        hour in 0u32..24,
    ) {
        let ctx = UserContext {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 2, 29, hour, 0, 0).unwrap()),
            prefers_color_scheme: scheme,
            viewport_width: width,
            viewport_height: height,
            touch_capable: touch,
            pixel_ratio: ratio,
            ..Default::default()
        };
        let history = vec![HistoricalEvent {
            duration,
            interaction_count: interactions,
            error_count: errors,
            scroll_depth: scroll,
            ..Default::default()
        }];
        let social = SocialAggregate::new().with("dark_mode_percentage", dark_pct);
        let v = FeatureProcessor::default().build(Some(&ctx), &history, &social, false);
        prop_assert_eq!(v.as_slice().len(), FEATURE_COUNT);
        for value in v.as_slice() {
            prop_assert!(value.is_finite());
            prop_assert!((-FEATURE_CLAMP..=FEATURE_CLAMP).contains(value));
        }
    }
}
