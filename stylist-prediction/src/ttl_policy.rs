//! Confidence → cache TTL.

use std::time::Duration;

use stylist_core::config::CacheConfig;
use stylist_core::models::Confidence;

/// Higher confidence predictions live longer; static fallback tokens get
/// the shortest TTL so a recovered bundle takes over quickly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TtlPolicy {
    pub high: Duration,
    pub medium: Duration,
    pub low: Duration,
    pub fallback: Duration,
    pub high_confidence: f64,
    pub medium_confidence: f64,
}

impl TtlPolicy {
    pub fn ttl_for(&self, confidence: &Confidence) -> Duration {
        if confidence.is_fallback() {
            self.fallback
        } else if confidence.score >= self.high_confidence {
            self.high
        } else if confidence.score >= self.medium_confidence {
            self.medium
        } else {
            self.low
        }
    }
}

impl From<&CacheConfig> for TtlPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            high: Duration::from_secs(config.ttl_high_secs),
            medium: Duration::from_secs(config.ttl_medium_secs),
            low: Duration::from_secs(config.ttl_low_secs),
            fallback: Duration::from_secs(config.ttl_fallback_secs),
            high_confidence: config.high_confidence,
            medium_confidence: config.medium_confidence,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_thresholds() {
        let policy = TtlPolicy::default();
        assert_eq!(policy.ttl_for(&Confidence::from(92.0)), Duration::from_secs(1800));
        assert_eq!(policy.ttl_for(&Confidence::from(80.0)), Duration::from_secs(1800));
        assert_eq!(policy.ttl_for(&Confidence::from(65.0)), Duration::from_secs(600));
        assert_eq!(policy.ttl_for(&Confidence::from(12.0)), Duration::from_secs(120));
    }

    #[test]
    fn fallback_ignores_score() {
        let policy = TtlPolicy::default();
        let c = Confidence::fallback(99.0, "default");
        assert_eq!(policy.ttl_for(&c), Duration::from_secs(60));
    }
}
