use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle state of the model manager.
///
/// `Unloaded → Loading → {Healthy, Partial, Degraded} → Recovering → Healthy | Degraded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ModelState {
    Unloaded = 0,
    Loading = 1,
    /// Both models and their transforms loaded and self-tested.
    Healthy = 2,
    /// One of the two models is missing; the other serves.
    Partial = 3,
    /// No learned models; only the static default mapping serves.
    Degraded = 4,
    Recovering = 5,
}

impl ModelState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Loading,
            2 => Self::Healthy,
            3 => Self::Partial,
            4 => Self::Degraded,
            5 => Self::Recovering,
            _ => Self::Unloaded,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Healthy => "healthy",
            Self::Partial => "partial",
            Self::Degraded => "degraded",
            Self::Recovering => "recovering",
        }
    }

    /// Whether the manager can answer predictions in this state.
    pub fn is_serving(self) -> bool {
        matches!(self, Self::Healthy | Self::Partial | Self::Degraded)
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model bundle tier, ranked by fidelity (best first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum BundleTier {
    /// Jointly trained classifier + regressor, full fidelity.
    Dual,
    /// Separately trained classifier and/or regressor.
    Individual,
    /// Hand-authored static mapping read from the bundle directory.
    Default,
    /// Hard-coded neutral token set, no artifacts at all.
    Emergency,
}

impl BundleTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dual => "dual",
            Self::Individual => "individual",
            Self::Default => "default",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for BundleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cheap snapshot of the model manager for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHealth {
    pub overall_status: ModelState,
    pub tier: Option<BundleTier>,
    pub classifier_online: bool,
    pub regressor_online: bool,
    pub feature_scaler_online: bool,
    pub target_scaler_online: bool,
    pub label_codec_online: bool,
    pub bundle_version: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub consecutive_validation_failures: u32,
}
