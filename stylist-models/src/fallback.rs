//! Static token mappings: the default tier read from `default_mapping.json`
//! and the hard-coded emergency set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stylist_core::context::UserContext;
use stylist_core::models::DesignTokenSet;
use stylist_features::DensityTier;

const NEUTRAL_CLASS: &str = "stylist-neutral";

const NEUTRAL_VARIABLES: &[(&str, &str)] = &[
    ("--font-size-base", "1rem"),
    ("--line-height", "1.5"),
    ("--spacing-unit", "1rem"),
    ("--border-radius", "4px"),
    ("--content-max-width", "1200px"),
    ("--touch-target-size", "44px"),
];

/// Classes and variable overrides for one density tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTokens {
    pub classes: Vec<String>,
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityTokens {
    pub compact: TierTokens,
    pub cozy: TierTokens,
    pub comfortable: TierTokens,
    pub spacious: TierTokens,
}

impl DensityTokens {
    fn get(&self, tier: DensityTier) -> &TierTokens {
        match tier {
            DensityTier::Compact => &self.compact,
            DensityTier::Cozy => &self.cozy,
            DensityTier::Comfortable => &self.comfortable,
            DensityTier::Spacious => &self.spacious,
        }
    }
}

/// Hand-authored mapping from coarse context to a token set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultMapping {
    pub version: String,
    pub base_classes: Vec<String>,
    pub dark_classes: Vec<String>,
    pub light_classes: Vec<String>,
    /// Variables shared by every tier; tier variables override them.
    pub variables: BTreeMap<String, String>,
    pub tiers: DensityTokens,
}

impl DefaultMapping {
    /// Neutral tokens compiled into the binary. Needs no artifacts at all.
    pub fn emergency() -> Self {
        let tier = |class: &str, font: &str, spacing: &str| TierTokens {
            classes: vec![class.to_string()],
            variables: BTreeMap::from([
                ("--font-size-base".to_string(), font.to_string()),
                ("--spacing-unit".to_string(), spacing.to_string()),
            ]),
        };
        Self {
            version: "emergency".to_string(),
            base_classes: vec![NEUTRAL_CLASS.to_string()],
            dark_classes: vec!["theme-dark".to_string()],
            light_classes: vec!["theme-light".to_string()],
            variables: NEUTRAL_VARIABLES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            tiers: DensityTokens {
                compact: tier("density-compact", "0.938rem", "0.75rem"),
                cozy: tier("density-cozy", "1rem", "0.875rem"),
                comfortable: tier("density-comfortable", "1rem", "1rem"),
                spacious: tier("density-spacious", "1.063rem", "1.25rem"),
            },
        }
    }

    /// A mapping that could never yield a class or a variable is unusable.
    pub fn validate(&self) -> Result<(), String> {
        let tiers = [
            &self.tiers.compact,
            &self.tiers.cozy,
            &self.tiers.comfortable,
            &self.tiers.spacious,
        ];
        let any_class = !self.base_classes.is_empty()
            || !self.dark_classes.is_empty()
            || tiers.iter().any(|t| !t.classes.is_empty());
        let any_variable =
            !self.variables.is_empty() || tiers.iter().any(|t| !t.variables.is_empty());
        if !any_class && !any_variable {
            return Err("mapping defines no classes and no variables".to_string());
        }
        let blank_key = self
            .variables
            .keys()
            .chain(tiers.iter().flat_map(|t| t.variables.keys()))
            .any(|k| k.trim().trim_start_matches('-').is_empty());
        if blank_key {
            return Err("mapping contains a blank variable name".to_string());
        }
        Ok(())
    }

    /// Tokens for a context. Always structurally valid: gaps are filled
    /// from the neutral set.
    pub fn tokens_for(&self, context: Option<&UserContext>) -> DesignTokenSet {
        let density = DensityTier::from_context(context);
        let tier = self.tiers.get(density);
        let dark = context.is_some_and(|c| c.prefers_dark());

        let mut tokens = DesignTokenSet::default();
        let scheme = if dark {
            &self.dark_classes
        } else {
            &self.light_classes
        };
        for class in self.base_classes.iter().chain(&tier.classes).chain(scheme) {
            tokens.push_class(class.as_str());
        }
        for (name, value) in self.variables.iter().chain(&tier.variables) {
            tokens.set_variable(name, value.as_str());
        }

        if tokens.css_classes.is_empty() {
            tokens.push_class(NEUTRAL_CLASS);
        }
        if tokens.css_variables.is_empty() {
            for (name, value) in NEUTRAL_VARIABLES {
                tokens.set_variable(name, *value);
            }
        }
        tokens
    }
}
