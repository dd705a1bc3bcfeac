//! Synthetic model bundles written into temporary directories.
//!
//! The trees split on a handful of real feature slots so tests can observe
//! context-dependent output:
//!
//! - classifier: `density_tier` picks one of three density classes
//! - regressor: `density_tier`, `prefers_dark`, and `touch_capable` move
//!   font size, content width, and touch target size
//!
//! Every helper panics with a descriptive message on I/O failure.

use std::path::Path;

use serde_json::{json, Value};
use stylist_features::schema::slot;
use stylist_features::FEATURE_NAMES;
use tempfile::TempDir;

pub const BUNDLE_VERSION: &str = "fixture-2024.06.1";
pub const CLASSIFIER_ACCURACY: f64 = 0.87;
pub const REGRESSOR_R2: f64 = 0.74;

pub const TARGET_NAMES: [&str; 6] = [
    "font_size_base",
    "line_height",
    "spacing_unit",
    "border_radius",
    "content_max_width",
    "touch_target_size",
];

/// Which individual-tier models to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndividualParts {
    pub classifier: bool,
    pub regressor: bool,
}

/// Full dual bundle plus a default mapping.
pub fn dual_bundle() -> TempDir {
    let dir = temp_dir();
    write_dual(dir.path(), class_mapping());
    write_json(dir.path(), "default_mapping.json", &default_mapping_json());
    dir
}

/// Individual-tier bundle with the chosen models and a default mapping.
pub fn individual_bundle(parts: IndividualParts) -> TempDir {
    let dir = temp_dir();
    write_json(dir.path(), "metadata.json", &metadata_json(class_mapping()));
    write_json(dir.path(), "scaler.json", &identity_scaler(FEATURE_NAMES.len()));
    if parts.classifier {
        write_json(dir.path(), "classifier.json", &classifier_json());
        write_json(dir.path(), "label_encoder.json", &label_encoder_json());
    }
    if parts.regressor {
        write_json(dir.path(), "regressor.json", &raw_regressor_json());
    }
    write_json(dir.path(), "default_mapping.json", &default_mapping_json());
    dir
}

/// Only `default_mapping.json`.
pub fn default_only_bundle() -> TempDir {
    let dir = temp_dir();
    write_json(dir.path(), "default_mapping.json", &default_mapping_json());
    dir
}

/// Dual bundle whose classifier file is truncated mid-document.
pub fn corrupt_dual_bundle() -> TempDir {
    let dir = dual_bundle();
    write_raw(dir.path(), "dual_classifier.json", r#"{"n_outputs": 3, "trees": [{"nodes": ["#);
    dir
}

/// Dual bundle whose metadata lists the features in the wrong order.
pub fn schema_mismatch_bundle() -> TempDir {
    let dir = dual_bundle();
    let mut metadata = metadata_json(class_mapping());
    if let Some(names) = metadata["feature_names"].as_array_mut() {
        names.swap(0, 1);
    }
    write_json(dir.path(), "metadata.json", &metadata);
    dir
}

/// Dual bundle that loads but whose classifier maps the neutral-context
/// class to no style classes, so the self-test drops it.
pub fn empty_output_bundle() -> TempDir {
    let dir = temp_dir();
    let mut mapping = class_mapping();
    mapping["1"] = json!([]);
    write_dual(dir.path(), mapping);
    write_json(dir.path(), "default_mapping.json", &default_mapping_json());
    dir
}

/// Write a dual bundle into an existing directory, e.g. to repair one
/// before a recovery.
pub fn write_dual_bundle(dir: &Path) {
    write_dual(dir, class_mapping());
    write_json(dir, "default_mapping.json", &default_mapping_json());
}

fn write_dual(dir: &Path, mapping: Value) {
    write_json(dir, "metadata.json", &metadata_json(mapping));
    write_json(dir, "dual_classifier.json", &classifier_json());
    write_json(dir, "dual_regressor.json", &scaled_regressor_json());
    write_json(dir, "label_encoder.json", &label_encoder_json());
    write_json(dir, "feature_scaler.json", &identity_scaler(FEATURE_NAMES.len()));
    write_json(dir, "target_scaler.json", &target_scaler_json());
}

pub fn metadata_json(class_mapping: Value) -> Value {
    json!({
        "version": BUNDLE_VERSION,
        "feature_names": FEATURE_NAMES,
        "class_mapping": class_mapping,
        "target_names": TARGET_NAMES,
        "metrics": {
            "classifier_accuracy": CLASSIFIER_ACCURACY,
            "regressor_r2": REGRESSOR_R2,
            "trained_at": "2024-06-01T00:00:00Z"
        }
    })
}

pub fn class_mapping() -> Value {
    json!({
        "0": ["density-compact", "layout-stacked"],
        "1": ["density-comfortable"],
        "2": ["density-spacious", "layout-wide"]
    })
}

pub fn label_encoder_json() -> Value {
    json!({ "classes": ["compact", "comfortable", "spacious"] })
}

/// Three-class classifier over the density tier slot.
///
/// compact (0.0) → class 0, cozy/comfortable (1/3, 2/3) → class 1,
/// spacious (1.0) → class 2.
pub fn classifier_json() -> Value {
    let d = slot::DENSITY_TIER;
    json!({
        "n_outputs": 3,
        "base_score": [0.0, 0.0, 0.0],
        "trees": [
            { "output": 0, "nodes": [split(d, 0.2, 1, 2), leaf(2.0), leaf(-1.0)] },
            { "output": 1, "nodes": [
                split(d, 0.2, 1, 2), leaf(-1.0),
                split(d, 0.8, 3, 4), leaf(2.0), leaf(-1.0)
            ] },
            { "output": 2, "nodes": [split(d, 0.8, 1, 2), leaf(-1.0), leaf(2.0)] }
        ]
    })
}

/// Regressor trained on standardized targets; pair with [`target_scaler_json`].
pub fn scaled_regressor_json() -> Value {
    json!({
        "n_outputs": 6,
        "base_score": [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        "trees": [
            { "output": 0, "nodes": [split(slot::DENSITY_TIER, 0.2, 1, 2), leaf(1.0), leaf(0.0)] },
            { "output": 0, "nodes": [split(slot::PREFERS_DARK, 0.5, 1, 2), leaf(0.0), leaf(0.4)] },
            { "output": 1, "nodes": [leaf(0.0)] },
            { "output": 2, "nodes": [leaf(0.0)] },
            { "output": 3, "nodes": [leaf(0.0)] },
            { "output": 4, "nodes": [split(slot::DENSITY_TIER, 0.8, 1, 2), leaf(0.0), leaf(1.5)] },
            { "output": 5, "nodes": [split(slot::TOUCH, 0.5, 1, 2), leaf(0.0), leaf(1.0)] }
        ]
    })
}

/// Target means and scales: font 1rem ± 0.125, line height 1.5, spacing
/// 1rem, radius 6px, content width 1100px ± 200, touch target 44px ± 4.
pub fn target_scaler_json() -> Value {
    json!({
        "mean": [1.0, 1.5, 1.0, 6.0, 1100.0, 44.0],
        "scale": [0.125, 0.1, 0.25, 2.0, 200.0, 4.0]
    })
}

/// Same behavior as the scaled regressor, in raw target units.
pub fn raw_regressor_json() -> Value {
    json!({
        "n_outputs": 6,
        "base_score": [1.0, 1.5, 1.0, 6.0, 1100.0, 44.0],
        "trees": [
            { "output": 0, "nodes": [split(slot::DENSITY_TIER, 0.2, 1, 2), leaf(0.125), leaf(0.0)] },
            { "output": 0, "nodes": [split(slot::PREFERS_DARK, 0.5, 1, 2), leaf(0.0), leaf(0.05)] },
            { "output": 4, "nodes": [split(slot::DENSITY_TIER, 0.8, 1, 2), leaf(0.0), leaf(300.0)] },
            { "output": 5, "nodes": [split(slot::TOUCH, 0.5, 1, 2), leaf(0.0), leaf(4.0)] }
        ]
    })
}

pub fn identity_scaler(len: usize) -> Value {
    json!({ "mean": vec![0.0; len], "scale": vec![1.0; len] })
}

pub fn default_mapping_json() -> Value {
    json!({
        "version": "defaults-2024.06",
        "base_classes": ["stylist"],
        "dark_classes": ["theme-dark"],
        "light_classes": ["theme-light"],
        "variables": {
            "font_size_base": "1rem",
            "line_height": "1.5",
            "spacing_unit": "1rem",
            "border_radius": "6px",
            "content_max_width": "1100px",
            "touch_target_size": "44px"
        },
        "tiers": {
            "compact": { "classes": ["density-compact"], "variables": { "--spacing-unit": "0.75rem" } },
            "cozy": { "classes": ["density-cozy"] },
            "comfortable": { "classes": ["density-comfortable"] },
            "spacious": { "classes": ["density-spacious"], "variables": { "--content-max-width": "1400px" } }
        }
    })
}

fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Value {
    json!({ "feature": feature, "threshold": threshold, "left": left, "right": right })
}

fn leaf(value: f64) -> Value {
    json!({ "value": value })
}

fn temp_dir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"))
}

/// Serialize `value` to `dir/name`.
pub fn write_json(dir: &Path, name: &str, value: &Value) {
    let body = serde_json::to_vec_pretty(value)
        .unwrap_or_else(|e| panic!("failed to serialize {name}: {e}"));
    write_bytes(dir, name, &body);
}

/// Write raw text, e.g. deliberately broken JSON.
pub fn write_raw(dir: &Path, name: &str, body: &str) {
    write_bytes(dir, name, body.as_bytes());
}

fn write_bytes(dir: &Path, name: &str, body: &[u8]) {
    let path = dir.join(name);
    std::fs::write(&path, body)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
}
