use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{BundleTier, Confidence, DesignTokenSet};
use crate::context::{HistoricalEvent, SocialAggregate, UserContext};

/// Everything the orchestrator needs for one prediction. History and social
/// aggregates are supplied already fetched; the core performs no I/O.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionRequest {
    /// `None` when the upstream context could not be built at all.
    pub context: Option<UserContext>,
    pub history: Vec<HistoricalEvent>,
    pub social: SocialAggregate,
    pub authenticated: bool,
    /// Extra caller-supplied fields folded into the cache fingerprint.
    pub extra: BTreeMap<String, String>,
}

impl PredictionRequest {
    pub fn new(context: UserContext) -> Self {
        Self {
            context: Some(context),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<HistoricalEvent>) -> Self {
        self.history = history;
        self
    }

    pub fn with_social(mut self, social: SocialAggregate) -> Self {
        self.social = social;
        self
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}

/// Result of a prediction. Always structurally valid; callers judge quality
/// only through `confidence`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionResponse {
    pub prediction_id: String,
    pub tokens: DesignTokenSet,
    pub confidence: Confidence,
    pub processing_time_ms: f64,
    pub cached: bool,
    pub model_tier: BundleTier,
}
