//! Configuration with layered resolution.
//!
//! Resolution order (highest priority first):
//! 1. Environment variables (`STYLIST_*`)
//! 2. Config file (`stylist.toml` or an explicit path)
//! 3. Compiled defaults

pub mod cache_config;
pub mod defaults;
pub mod feature_config;
pub mod model_config;
pub mod observability_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use feature_config::FeatureConfig;
pub use model_config::ModelConfig;
pub use observability_config::ObservabilityConfig;

use crate::errors::ConfigError;

/// Environment variable overriding `models.bundle_dir`.
pub const ENV_MODEL_DIR: &str = "STYLIST_MODEL_DIR";
/// Environment variable overriding `cache.max_entries`.
pub const ENV_CACHE_MAX_ENTRIES: &str = "STYLIST_CACHE_MAX_ENTRIES";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "STYLIST_LOG";

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StylistConfig {
    pub models: ModelConfig,
    pub cache: CacheConfig,
    pub features: FeatureConfig,
    pub observability: ObservabilityConfig,
}

impl StylistConfig {
    /// Load configuration from an optional file, then apply environment overrides.
    ///
    /// A missing explicit path is an error; with no path, `stylist.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new("stylist.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `STYLIST_*` overrides using the given variable lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_MODEL_DIR) {
            self.models.bundle_dir = dir;
        }
        if let Some(raw) = lookup(ENV_CACHE_MAX_ENTRIES) {
            self.cache.max_entries =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: ENV_CACHE_MAX_ENTRIES.to_string(),
                        message: format!("expected an integer, got {raw:?}"),
                    })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.observability.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.cache.max_entry_bytes > self.cache.max_bytes {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entry_bytes".to_string(),
                message: "must not exceed cache.max_bytes".to_string(),
            });
        }
        if self.cache.medium_confidence > self.cache.high_confidence {
            return Err(ConfigError::ValidationFailed {
                field: "cache.medium_confidence".to_string(),
                message: "must not exceed cache.high_confidence".to_string(),
            });
        }
        for (field, value) in [
            ("features.reference_width", self.features.reference_width),
            ("features.reference_height", self.features.reference_height),
            ("features.reference_pixel_ratio", self.features.reference_pixel_ratio),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if self.models.bundle_dir.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "models.bundle_dir".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
