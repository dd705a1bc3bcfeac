//! Sanitized aggregate over a visitor's past sessions.

use stylist_core::context::HistoricalEvent;
use tracing::debug;

/// Totals over the usable parts of a history list.
///
/// Negative, non-finite, and missing values are skipped per field rather than
/// discarding the whole event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistorySummary {
    pub sessions: usize,
    pub duration_samples: usize,
    pub total_duration_secs: f64,
    pub interaction_samples: usize,
    pub total_interactions: f64,
    pub total_errors: f64,
    pub scroll_samples: usize,
    pub total_scroll_depth: f64,
    pub rejected_values: usize,
}

impl HistorySummary {
    pub fn from_events(events: &[HistoricalEvent]) -> Self {
        let mut summary = Self {
            sessions: events.len(),
            ..Default::default()
        };

        for event in events {
            match sanitize(event.duration) {
                Ok(Some(d)) => {
                    summary.duration_samples += 1;
                    summary.total_duration_secs = saturating_add(summary.total_duration_secs, d);
                }
                Ok(None) => {}
                Err(()) => summary.rejected_values += 1,
            }
            match sanitize(event.interaction_count) {
                Ok(Some(n)) => {
                    summary.interaction_samples += 1;
                    summary.total_interactions = saturating_add(summary.total_interactions, n);
                }
                Ok(None) => {}
                Err(()) => summary.rejected_values += 1,
            }
            match sanitize(event.error_count) {
                Ok(Some(n)) => summary.total_errors = saturating_add(summary.total_errors, n),
                Ok(None) => {}
                Err(()) => summary.rejected_values += 1,
            }
            match sanitize(event.scroll_depth) {
                Ok(Some(depth)) => {
                    // Percentages are accepted alongside fractions.
                    let fraction = if depth > 1.0 { depth / 100.0 } else { depth };
                    summary.scroll_samples += 1;
                    summary.total_scroll_depth += fraction.clamp(0.0, 1.0);
                }
                Ok(None) => {}
                Err(()) => summary.rejected_values += 1,
            }
        }

        if summary.rejected_values > 0 {
            debug!(
                rejected = summary.rejected_values,
                sessions = summary.sessions,
                "skipped unusable history values"
            );
        }
        summary
    }

    /// Whether any numeric signal survived sanitization.
    pub fn has_signal(&self) -> bool {
        self.duration_samples > 0 || self.interaction_samples > 0 || self.scroll_samples > 0
    }

    pub fn mean_duration_secs(&self) -> Option<f64> {
        (self.duration_samples > 0).then(|| self.total_duration_secs / self.duration_samples as f64)
    }

    pub fn mean_scroll_depth(&self) -> Option<f64> {
        (self.scroll_samples > 0).then(|| self.total_scroll_depth / self.scroll_samples as f64)
    }

    /// Errors per interaction, zero when nothing was interacted with.
    pub fn error_rate(&self) -> f64 {
        if self.total_interactions > 0.0 {
            (self.total_errors / self.total_interactions).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Interactions per second of recorded session time.
    pub fn interactions_per_second(&self) -> Option<f64> {
        (self.total_duration_secs > 0.0 && self.interaction_samples > 0)
            .then(|| self.total_interactions / self.total_duration_secs)
    }
}

/// Sums of huge but finite values stick at `f64::MAX` instead of overflowing.
fn saturating_add(total: f64, value: f64) -> f64 {
    let sum = total + value;
    if sum.is_finite() {
        sum
    } else {
        f64::MAX
    }
}

/// `Ok(None)` for absent, `Err` for present-but-unusable.
fn sanitize(value: Option<f64>) -> Result<Option<f64>, ()> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        Some(_) => Err(()),
    }
}
