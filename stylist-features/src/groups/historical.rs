use stylist_core::errors::FeatureError;

use crate::history::HistorySummary;
use crate::schema::NEW_USER_DEFAULTS;

/// Session duration that maps to 1.0 (ten minutes).
const REFERENCE_SESSION_SECS: f64 = 600.0;
/// Lifetime interaction count that maps to 1.0.
const REFERENCE_INTERACTIONS: f64 = 1_000.0;
/// Interactions per minute that map to an engagement of 1.0.
const REFERENCE_INTERACTIONS_PER_MINUTE: f64 = 10.0;

/// `[avg_session_duration, total_interactions, avg_scroll_depth, error_rate, engagement]`.
///
/// Empty history yields the new-user defaults verbatim; a history with no
/// usable numeric values is an error (and also ends up at the defaults).
pub fn compute(summary: &HistorySummary) -> Result<[f64; 5], FeatureError> {
    if summary.sessions == 0 {
        return Ok(NEW_USER_DEFAULTS);
    }
    if !summary.has_signal() {
        return Err(FeatureError::InvalidValue {
            field: "history",
            value: format!("{} sessions without usable values", summary.sessions),
        });
    }

    let avg_duration = summary
        .mean_duration_secs()
        .map(|d| d / REFERENCE_SESSION_SECS)
        .unwrap_or(NEW_USER_DEFAULTS[0]);
    let interactions = if summary.interaction_samples > 0 {
        (1.0 + summary.total_interactions).ln() / (1.0 + REFERENCE_INTERACTIONS).ln()
    } else {
        NEW_USER_DEFAULTS[1]
    };
    let scroll = summary.mean_scroll_depth().unwrap_or(NEW_USER_DEFAULTS[2]);
    let error_rate = summary.error_rate();

    // Laplace-smoothed interactions per minute, so one short session with a
    // single click does not read as extreme engagement.
    let minutes = summary.total_duration_secs / 60.0;
    let engagement =
        ((summary.total_interactions + 1.0) / (minutes + 2.0)) / REFERENCE_INTERACTIONS_PER_MINUTE;

    Ok([avg_duration, interactions, scroll, error_rate, engagement])
}
