use std::f64::consts::TAU;

use chrono::{DateTime, Datelike, Timelike, Utc};
use stylist_core::errors::FeatureError;

/// `[hour_sin, hour_cos, day_sin, day_cos]`.
///
/// Cyclic encoding keeps 23:59 next to 00:00 and Dec 31 next to Jan 1.
pub fn compute(timestamp: Option<DateTime<Utc>>) -> Result<[f64; 4], FeatureError> {
    let ts = timestamp.ok_or(FeatureError::MissingField { field: "timestamp" })?;
    let hour = ts.hour() as f64 + ts.minute() as f64 / 60.0;
    let day = ts.ordinal0() as f64;
    let hour_angle = TAU * hour / 24.0;
    let day_angle = TAU * day / 365.0;
    Ok([
        hour_angle.sin(),
        hour_angle.cos(),
        day_angle.sin(),
        day_angle.cos(),
    ])
}
