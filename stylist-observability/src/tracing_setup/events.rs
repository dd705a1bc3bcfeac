//! Structured log events for key operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a bundle tier that loaded successfully.
pub fn tier_loaded(tier: &str, version: Option<&str>, attempt: u32) {
    tracing::info!(
        event = "tier_loaded",
        tier = %tier,
        version = ?version,
        attempt = attempt,
        "model bundle tier loaded"
    );
}

/// Log a bundle tier that failed to load.
pub fn tier_failed(tier: &str, error: &str, transient: bool) {
    tracing::warn!(
        event = "tier_failed",
        tier = %tier,
        error = %error,
        transient = transient,
        "model bundle tier failed, trying next"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a model demoted by a failed self-test.
pub fn model_demoted(component: &str, reason: &str) {
    tracing::warn!(
        event = "model_demoted",
        component = %component,
        reason = %reason,
        "model failed self-test and was taken offline"
    );
}

/// Log a served prediction.
pub fn prediction_served(tier: &str, confidence: f64, cached: bool, elapsed_ms: f64) {
    tracing::debug!(
        event = "prediction_served",
        tier = %tier,
        confidence = confidence,
        cached = cached,
        elapsed_ms = elapsed_ms,
        "prediction served"
    );
}

/// Log a per-call fallback to static tokens.
pub fn prediction_fallback(tier: &str, error: &str) {
    tracing::warn!(
        event = "prediction_fallback",
        tier = %tier,
        error = %error,
        "inference failed, serving static tokens"
    );
}

/// Log an LRU or TTL eviction.
pub fn cache_evicted(reason: &str, count: usize) {
    tracing::debug!(
        event = "cache_evicted",
        reason = %reason,
        count = count,
        "cache entries evicted"
    );
}

/// Log a payload refused by the cache.
pub fn cache_rejected(size: usize, limit: usize) {
    tracing::warn!(
        event = "cache_rejected",
        size = size,
        limit = limit,
        "payload exceeds cache entry ceiling"
    );
}

/// Log a finished recovery.
pub fn recovery_completed(from: &str, to: &str, elapsed_ms: f64) {
    tracing::info!(
        event = "recovery_completed",
        from = %from,
        to = %to,
        elapsed_ms = elapsed_ms,
        "model recovery completed"
    );
}
