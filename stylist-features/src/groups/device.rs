use stylist_core::config::FeatureConfig;
use stylist_core::context::UserContext;
use stylist_core::errors::FeatureError;

/// Aspect ratios outside this range are clamped.
pub const ASPECT_RATIO_RANGE: (f64, f64) = (0.4, 3.6);

/// `[width_norm, height_norm, aspect_ratio, log_area, touch]`.
pub fn compute(ctx: &UserContext, config: &FeatureConfig) -> Result<[f64; 5], FeatureError> {
    let width = viewport_dimension(ctx.viewport_width, "viewport_width")?;
    let height = viewport_dimension(ctx.viewport_height, "viewport_height")?;

    let aspect = (width / height).clamp(ASPECT_RATIO_RANGE.0, ASPECT_RATIO_RANGE.1);
    // ln(1 + area) against the reference area: phone ≈ 0.86, 4K ≈ 1.1.
    let reference_area = config.reference_width * config.reference_height;
    let area = width * height;
    let log_area_raw = if area.is_finite() {
        (1.0 + area).ln()
    } else {
        width.ln() + height.ln()
    };
    let log_area = log_area_raw / (1.0 + reference_area).ln();

    Ok([
        width / config.reference_width,
        height / config.reference_height,
        aspect,
        log_area,
        if touch_capable(ctx) { 1.0 } else { 0.0 },
    ])
}

/// A usable viewport dimension: present, finite, strictly positive.
pub fn viewport_dimension(value: Option<f64>, field: &'static str) -> Result<f64, FeatureError> {
    match value {
        None => Err(FeatureError::MissingField { field }),
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(FeatureError::InvalidValue {
            field,
            value: v.to_string(),
        }),
    }
}

/// Explicit touch flag, else a user-agent sniff for common mobile markers.
pub fn touch_capable(ctx: &UserContext) -> bool {
    if let Some(touch) = ctx.touch_capable {
        return touch;
    }
    ctx.user_agent
        .as_deref()
        .map(|ua| {
            ["Mobi", "Android", "iPhone", "iPad", "Touch"]
                .iter()
                .any(|marker| ua.contains(marker))
        })
        .unwrap_or(false)
}
