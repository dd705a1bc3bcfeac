//! Coarse, order-independent context fingerprints.
//!
//! Only a fixed projection of the context is hashed: viewport, color scheme,
//! touch, pixel ratio, authentication, and hour of day, plus any extra
//! caller fields. Near-identical visits therefore share a key.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Timelike;
use serde_json::Value;
use stylist_core::context::{ColorScheme, UserContext};
use stylist_core::errors::CacheError;
use tracing::warn;

/// Prefix of keys that can never hit.
pub const UNCACHEABLE_PREFIX: &str = "nocache:";

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fingerprint a request, or a unique time-based key if hashing fails, so
/// the cache degrades to always-miss instead of colliding.
pub fn key(
    context: Option<&UserContext>,
    authenticated: bool,
    extra: &BTreeMap<String, String>,
) -> String {
    match fingerprint(context, authenticated, extra) {
        Ok(k) => k,
        Err(e) => {
            warn!(error = %e, "context fingerprint failed, request will not be cached");
            fallback_key()
        }
    }
}

/// blake3 hex digest of the canonical JSON projection.
pub fn fingerprint(
    context: Option<&UserContext>,
    authenticated: bool,
    extra: &BTreeMap<String, String>,
) -> Result<String, CacheError> {
    let projection = project(context, authenticated, extra);
    let canonical =
        serde_json::to_string(&projection).map_err(|e| CacheError::FingerprintFailed {
            reason: e.to_string(),
        })?;
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Whether a key came from the failure path.
pub fn is_uncacheable(key: &str) -> bool {
    key.starts_with(UNCACHEABLE_PREFIX)
}

fn project(
    context: Option<&UserContext>,
    authenticated: bool,
    extra: &BTreeMap<String, String>,
) -> BTreeMap<String, Value> {
    let mut fields = BTreeMap::new();
    fields.insert("authenticated".to_string(), Value::Bool(authenticated));

    if let Some(ctx) = context {
        fields.insert("viewport_width".into(), rounded(ctx.viewport_width, 0));
        fields.insert("viewport_height".into(), rounded(ctx.viewport_height, 0));
        fields.insert("pixel_ratio".into(), rounded(ctx.pixel_ratio, 2));
        fields.insert(
            "touch".into(),
            ctx.touch_capable.map(Value::Bool).unwrap_or(Value::Null),
        );
        let scheme = match ctx.color_scheme() {
            Some(ColorScheme::Dark) => "dark",
            Some(ColorScheme::Light) => "light",
            Some(ColorScheme::NoPreference) | None => "none",
        };
        fields.insert("color_scheme".into(), Value::String(scheme.to_string()));
        fields.insert(
            "hour".into(),
            ctx.timestamp
                .map(|t| Value::from(t.hour()))
                .unwrap_or(Value::Null),
        );
    } else {
        fields.insert("context".into(), Value::Null);
    }

    for (k, v) in extra {
        fields.insert(format!("extra.{k}"), Value::String(v.clone()));
    }
    fields
}

/// Round to `decimals` places; non-finite and missing values hash as null.
fn rounded(value: Option<f64>, decimals: i32) -> Value {
    value
        .filter(|v| v.is_finite())
        .map(|v| {
            let factor = 10f64.powi(decimals);
            (v * factor).round() / factor
        })
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn fallback_key() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{UNCACHEABLE_PREFIX}{nanos}:{seq}")
}
