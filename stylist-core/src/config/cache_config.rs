use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Prediction cache configuration, including the confidence → TTL policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached predictions.
    pub max_entries: usize,
    /// Aggregate byte ceiling across all entries.
    pub max_bytes: usize,
    /// Payloads above this size are never cached.
    pub max_entry_bytes: usize,
    /// TTL used when the caller does not choose one.
    pub default_ttl_secs: u64,
    /// TTL for predictions with confidence at or above `high_confidence`.
    pub ttl_high_secs: u64,
    /// TTL for predictions with confidence at or above `medium_confidence`.
    pub ttl_medium_secs: u64,
    /// TTL for the remaining learned predictions.
    pub ttl_low_secs: u64,
    /// TTL for static fallback token sets.
    pub ttl_fallback_secs: u64,
    pub high_confidence: f64,
    pub medium_confidence: f64,
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: defaults::DEFAULT_CACHE_MAX_ENTRIES,
            max_bytes: defaults::DEFAULT_CACHE_MAX_BYTES,
            max_entry_bytes: defaults::DEFAULT_CACHE_MAX_ENTRY_BYTES,
            default_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            ttl_high_secs: defaults::DEFAULT_TTL_HIGH_SECS,
            ttl_medium_secs: defaults::DEFAULT_TTL_MEDIUM_SECS,
            ttl_low_secs: defaults::DEFAULT_TTL_LOW_SECS,
            ttl_fallback_secs: defaults::DEFAULT_TTL_FALLBACK_SECS,
            high_confidence: defaults::DEFAULT_HIGH_CONFIDENCE,
            medium_confidence: defaults::DEFAULT_MEDIUM_CONFIDENCE,
        }
    }
}
