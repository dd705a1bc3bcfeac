use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use stylist_core::config::FeatureConfig;
use stylist_core::context::UserContext;

use super::device::{touch_capable, viewport_dimension};
use crate::history::HistorySummary;
use crate::schema::DERIVED_DEFAULTS;

/// Language-region tokens embedded in user-agent strings, e.g. `ko-kr; LG-L160L`.
static UA_LOCALE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s;(])([a-zA-Z]{2})[-_][a-zA-Z]{2}(?:[\s;)]|$)").ok());

/// Interactions per second above which the speed slot saturates.
const MAX_INTERACTION_SPEED: f64 = 10.0;
const HIGH_DENSITY_PIXEL_RATIO: f64 = 2.0;

/// Coarse layout density derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityTier {
    Compact,
    Cozy,
    Comfortable,
    Spacious,
}

impl DensityTier {
    pub fn from_width(width: f64) -> Self {
        if width < 768.0 {
            Self::Compact
        } else if width < 1024.0 {
            Self::Cozy
        } else if width < 1920.0 {
            Self::Comfortable
        } else {
            Self::Spacious
        }
    }

    /// Tier for a possibly-missing width; unusable widths read as desktop.
    pub fn from_context(ctx: Option<&UserContext>) -> Self {
        ctx.and_then(|c| viewport_dimension(c.viewport_width, "viewport_width").ok())
            .map(Self::from_width)
            .unwrap_or(Self::Comfortable)
    }

    pub fn feature_value(self) -> f64 {
        match self {
            Self::Compact => 0.0,
            Self::Cozy => 1.0 / 3.0,
            Self::Comfortable => 2.0 / 3.0,
            Self::Spacious => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Cozy => "cozy",
            Self::Comfortable => "comfortable",
            Self::Spacious => "spacious",
        }
    }
}

/// Coarse script/region grouping of the visitor's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleBucket {
    English,
    European,
    Cjk,
    RightToLeft,
    Other,
}

impl LocaleBucket {
    pub fn from_language(lang: &str) -> Self {
        match lang.to_ascii_lowercase().as_str() {
            "en" => Self::English,
            "de" | "fr" | "es" | "it" | "pt" | "nl" | "sv" | "da" | "no" | "nb" | "fi" | "pl"
            | "cs" | "ru" | "uk" => Self::European,
            "zh" | "ja" | "ko" => Self::Cjk,
            "ar" | "he" | "fa" | "ur" => Self::RightToLeft,
            _ => Self::Other,
        }
    }

    /// Explicit locale first, then a language tag sniffed from the user agent.
    pub fn infer(ctx: &UserContext) -> Self {
        let from_locale = ctx
            .locale
            .as_deref()
            .and_then(|l| l.split(['-', '_']).next())
            .filter(|lang| lang.len() == 2);
        if let Some(lang) = from_locale {
            return Self::from_language(lang);
        }
        ctx.user_agent
            .as_deref()
            .and_then(|ua| {
                UA_LOCALE
                    .as_ref()
                    .and_then(|re| re.captures(ua))
                    .and_then(|caps| caps.get(1))
                    .map(|m| Self::from_language(m.as_str()))
            })
            .unwrap_or(Self::English)
    }

    pub fn feature_value(self) -> f64 {
        match self {
            Self::English => 0.0,
            Self::European => 0.25,
            Self::Cjk => 0.5,
            Self::RightToLeft => 0.75,
            Self::Other => 1.0,
        }
    }
}

/// `[pixel_density, interaction_speed, density_tier, locale_bucket,
/// accessibility_score, network_tier]`.
///
/// Each signal defaults independently, so this group never fails as a whole.
pub fn compute(ctx: &UserContext, summary: &HistorySummary, config: &FeatureConfig) -> [f64; 6] {
    let pixel_ratio = ctx
        .pixel_ratio
        .filter(|r| r.is_finite() && *r > 0.0);
    let width = viewport_dimension(ctx.viewport_width, "viewport_width").ok();
    let touch = touch_capable(ctx);

    let pixel_density = pixel_ratio
        .map(|r| r / config.reference_pixel_ratio)
        .unwrap_or(DERIVED_DEFAULTS[0]);

    let interaction_speed = summary
        .interactions_per_second()
        .map(|s| s.min(MAX_INTERACTION_SPEED))
        .unwrap_or(DERIVED_DEFAULTS[1]);

    let density_tier = width
        .map(|w| DensityTier::from_width(w).feature_value())
        .unwrap_or(DERIVED_DEFAULTS[2]);

    let locale_bucket = LocaleBucket::infer(ctx).feature_value();

    [
        pixel_density,
        interaction_speed,
        density_tier,
        locale_bucket,
        accessibility_score(ctx, pixel_ratio, touch),
        network_tier(ctx, width, touch),
    ]
}

/// Weighted sum of high-density display, touch, and explicit accessibility hints.
fn accessibility_score(ctx: &UserContext, pixel_ratio: Option<f64>, touch: bool) -> f64 {
    let high_density = pixel_ratio.is_some_and(|r| r >= HIGH_DENSITY_PIXEL_RATIO);
    let hinted = ctx.accessibility.as_ref().is_some_and(|a| {
        a.prefers_reduced_motion == Some(true)
            || a.forced_colors == Some(true)
            || a.prefers_contrast.as_deref() == Some("more")
    });
    let mut score = 0.0;
    if high_density {
        score += 0.5;
    }
    if touch {
        score += 0.3;
    }
    if hinted {
        score += 0.2;
    }
    score
}

/// Network hint when present, else a guess from the device class.
fn network_tier(ctx: &UserContext, width: Option<f64>, touch: bool) -> f64 {
    if let Some(net) = &ctx.network {
        let hinted = match net.effective_type.as_deref() {
            Some("slow-2g") => Some(0.0_f64),
            Some("2g") => Some(0.25),
            Some("3g") => Some(0.5),
            Some("4g") => Some(1.0),
            _ => None,
        };
        if let Some(tier) = hinted {
            return if net.save_data == Some(true) {
                tier.min(0.25)
            } else {
                tier
            };
        }
        if net.save_data == Some(true) {
            return 0.25;
        }
    }
    match (touch, width) {
        (true, Some(w)) if w < 768.0 => 0.5,
        (true, Some(w)) if w < 1280.0 => 0.75,
        (true, None) => 0.5,
        _ => DERIVED_DEFAULTS[5],
    }
}
