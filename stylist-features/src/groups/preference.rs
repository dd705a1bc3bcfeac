use stylist_core::constants::SOCIAL_DARK_MODE_KEY;
use stylist_core::context::{ColorScheme, SocialAggregate, UserContext};
use stylist_core::errors::FeatureError;

/// `[prefers_dark]`.
///
/// An explicit preference wins. Without one, the population share preferring
/// dark mode serves as a weak prior.
pub fn compute(ctx: &UserContext, social: &SocialAggregate) -> Result<[f64; 1], FeatureError> {
    let prior = social.fraction(SOCIAL_DARK_MODE_KEY).unwrap_or(0.0);
    match ctx.prefers_color_scheme.as_deref() {
        None => Ok([prior]),
        Some(raw) => match ColorScheme::parse(raw) {
            Some(ColorScheme::Dark) => Ok([1.0]),
            Some(ColorScheme::Light) => Ok([0.0]),
            Some(ColorScheme::NoPreference) => Ok([prior]),
            None => Err(FeatureError::InvalidValue {
                field: "prefers_color_scheme",
                value: raw.to_string(),
            }),
        },
    }
}
