use serde::{Deserialize, Serialize};

/// Point-in-time cache statistics.
///
/// `partial` is set when the snapshot was taken while a writer held the
/// lock; entry and byte counts then come from the last completed write and
/// `avg_hits_per_entry` is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, zero before the first lookup.
    pub hit_rate: f64,
    pub entries: usize,
    pub bytes: usize,
    pub avg_hits_per_entry: f64,
    pub partial: bool,
}

impl CacheStats {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub(crate) fn hit_rate_of(hits: u64, misses: u64) -> f64 {
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
