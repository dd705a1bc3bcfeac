//! # stylist-cache
//!
//! Process-local cache of design token predictions.
//!
//! Keys are coarse blake3 fingerprints of the request context. Entries carry
//! a caller-chosen TTL and are evicted least-recently-used once either the
//! entry-count or the aggregate byte ceiling would be exceeded.

pub mod entry;
pub mod fingerprint;
pub mod prediction_cache;
pub mod stats;

pub use entry::CachedPrediction;
pub use fingerprint::{fingerprint, key};
pub use prediction_cache::PredictionCache;
pub use stats::CacheStats;
