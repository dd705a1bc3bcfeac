//! PredictionCache: bounded TTL + LRU map behind a single `RwLock`.
//!
//! Hits only take the read lock: per-entry hit counts and recency ticks are
//! atomics. Expired entries are removed under the write lock as soon as a
//! lookup finds them. Statistics never wait on a writer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError};
use std::time::{Duration, Instant};

use stylist_core::config::CacheConfig;
use stylist_core::errors::CacheError;
use stylist_core::traits::{Clock, SystemClock};
use stylist_observability::tracing_setup::events;
use tracing::debug;

use crate::entry::{CacheEntry, CachedPrediction};
use crate::fingerprint::is_uncacheable;
use crate::stats::CacheStats;

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    bytes: usize,
}

impl Inner {
    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.bytes = self.bytes.saturating_sub(entry.size);
                true
            }
            None => false,
        }
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let mut freed = 0;
        self.entries.retain(|_, e| {
            let keep = !e.is_expired(now);
            if !keep {
                freed += e.size;
            }
            keep
        });
        self.bytes = self.bytes.saturating_sub(freed);
        before - self.entries.len()
    }

    fn least_recently_used(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, e)| e.last_access.load(Ordering::Relaxed))
            .map(|(k, _)| k.clone())
    }
}

/// Process-local prediction cache.
pub struct PredictionCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    inner: RwLock<Inner>,
    hits: AtomicU64,
    misses: AtomicU64,
    tick: AtomicU64,
    // Mirrors of the locked counts, read when a stats call finds the lock busy.
    entry_count: AtomicUsize,
    byte_count: AtomicUsize,
}

impl std::fmt::Debug for PredictionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionCache")
            .field("max_entries", &self.config.max_entries)
            .field("max_bytes", &self.config.max_bytes)
            .field("entries", &self.entry_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl PredictionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            inner: RwLock::new(Inner::default()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            tick: AtomicU64::new(0),
            entry_count: AtomicUsize::new(0),
            byte_count: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a fresh entry. Misses and expirations both count as misses.
    pub fn get(&self, key: &str) -> Option<CachedPrediction> {
        let now = self.clock.now();
        {
            let inner = self.read();
            match inner.entries.get(key) {
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
                Some(entry) if !entry.is_expired(now) => {
                    entry.touch(self.next_tick());
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(entry.payload.clone());
                }
                Some(_) => {}
            }
        }

        let mut inner = self.write();
        // Re-check: another writer may have refreshed the key meanwhile.
        let still_expired = inner.entries.get(key).is_some_and(|e| e.is_expired(now));
        if still_expired {
            inner.remove(key);
            self.sync_mirrors(&inner);
            events::cache_evicted("ttl", 1);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a prediction. `ttl` of `None` uses the configured default.
    ///
    /// Payloads above the per-entry ceiling are refused. Otherwise expired
    /// entries go first, then least-recently-used ones, until both the entry
    /// and byte ceilings hold with the new entry in place.
    pub fn put(
        &self,
        key: impl Into<String>,
        payload: CachedPrediction,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let key = key.into();
        if is_uncacheable(&key) {
            debug!("uncacheable key, skipping insert");
            return Ok(());
        }

        let size = key.len() + payload.approximate_size();
        let limit = self.config.max_entry_bytes.min(self.config.max_bytes);
        if size > limit || self.config.max_entries == 0 {
            events::cache_rejected(size, limit);
            return Err(CacheError::PayloadTooLarge { size, limit });
        }

        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        let now = self.clock.now();
        let mut inner = self.write();
        inner.remove(&key);

        let over = |inner: &Inner| {
            inner.entries.len() + 1 > self.config.max_entries
                || inner.bytes + size > self.config.max_bytes
        };

        if over(&inner) {
            let expired = inner.purge_expired(now);
            if expired > 0 {
                events::cache_evicted("ttl", expired);
            }
        }

        let mut evicted = 0;
        while over(&inner) {
            let Some(victim) = inner.least_recently_used() else {
                break;
            };
            inner.remove(&victim);
            evicted += 1;
        }
        if evicted > 0 {
            events::cache_evicted("lru", evicted);
        }

        let entry = CacheEntry::new(payload, now, ttl, self.next_tick(), size);
        inner.entries.insert(key, entry);
        inner.bytes += size;
        self.sync_mirrors(&inner);
        Ok(())
    }

    /// Whether a fresh entry exists. Does not count as a lookup.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.read().entries.get(key).is_some_and(|e| !e.is_expired(now))
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.write();
        let removed = inner.remove(key);
        self.sync_mirrors(&inner);
        removed
    }

    /// Drop every entry and reset the hit/miss counters.
    pub fn clear(&self) {
        let mut inner = self.write();
        let count = inner.entries.len();
        inner.entries.clear();
        inner.bytes = 0;
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.sync_mirrors(&inner);
        if count > 0 {
            events::cache_evicted("clear", count);
        }
    }

    /// Number of stored entries, expired ones included until they are touched.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate size of the stored entries in bytes.
    pub fn bytes(&self) -> usize {
        self.read().bytes
    }

    /// Snapshot statistics without waiting on a writer.
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = CacheStats::hit_rate_of(hits, misses);

        let guard = match self.inner.try_read() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(p)) => Some(p.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        };

        match guard {
            Some(inner) => {
                let entries = inner.entries.len();
                let total_hits: u64 = inner
                    .entries
                    .values()
                    .map(|e| e.hits.load(Ordering::Relaxed))
                    .sum();
                CacheStats {
                    hits,
                    misses,
                    hit_rate,
                    entries,
                    bytes: inner.bytes,
                    avg_hits_per_entry: if entries == 0 {
                        0.0
                    } else {
                        total_hits as f64 / entries as f64
                    },
                    partial: false,
                }
            }
            None => CacheStats {
                hits,
                misses,
                hit_rate,
                entries: self.entry_count.load(Ordering::Relaxed),
                bytes: self.byte_count.load(Ordering::Relaxed),
                avg_hits_per_entry: 0.0,
                partial: true,
            },
        }
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    fn sync_mirrors(&self, inner: &Inner) {
        self.entry_count.store(inner.entries.len(), Ordering::Relaxed);
        self.byte_count.store(inner.bytes, Ordering::Relaxed);
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
