//! Cached payload and per-entry bookkeeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use stylist_core::models::{BundleTier, Confidence, DesignTokenSet};

/// What the cache stores for one fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedPrediction {
    pub tokens: DesignTokenSet,
    pub confidence: Confidence,
    pub model_tier: BundleTier,
}

impl CachedPrediction {
    pub fn new(tokens: DesignTokenSet, confidence: Confidence, model_tier: BundleTier) -> Self {
        Self {
            tokens,
            confidence,
            model_tier,
        }
    }

    /// Approximate heap footprint in bytes.
    pub fn approximate_size(&self) -> usize {
        self.tokens.approximate_size()
            + std::mem::size_of::<Confidence>()
            + self.confidence.breakdown.source.len()
    }
}

#[derive(Debug)]
pub(crate) struct CacheEntry {
    pub payload: CachedPrediction,
    pub inserted_at: Instant,
    pub ttl: Duration,
    pub hits: AtomicU64,
    /// Logical access tick; the smallest value is least recently used.
    pub last_access: AtomicU64,
    /// Key plus payload bytes.
    pub size: usize,
}

impl CacheEntry {
    pub fn new(payload: CachedPrediction, now: Instant, ttl: Duration, tick: u64, size: usize) -> Self {
        Self {
            payload,
            inserted_at: now,
            ttl,
            hits: AtomicU64::new(0),
            last_access: AtomicU64::new(tick),
            size,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }

    pub fn touch(&self, tick: u64) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.last_access.store(tick, Ordering::Relaxed);
    }
}
