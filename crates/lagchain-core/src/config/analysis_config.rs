//! Top-level per-run configuration.

use serde::{Deserialize, Serialize};

use super::{
    AlignmentConfig, AnchorConfig, NullModelConfig, ObservabilityConfig, SimulationConfig,
    StabilityConfig,
};
use crate::errors::ConfigError;

/// Aggregates all sub-configs for one analysis run. Passed explicitly to
/// every engine so several runs can coexist in one process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub alignment: AlignmentConfig,
    pub null_model: NullModelConfig,
    pub stability: StabilityConfig,
    pub anchors: AnchorConfig,
    pub simulation: SimulationConfig,
    pub observability: ObservabilityConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            source_name: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            source_name: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alignment.lag_min > self.alignment.lag_max {
            return Err(invalid(
                "alignment.lag_min",
                format!(
                    "must not exceed lag_max ({} > {})",
                    self.alignment.lag_min, self.alignment.lag_max
                ),
            ));
        }
        let mut seen = std::collections::BTreeSet::new();
        for pair in &self.alignment.edge_pairs {
            if pair.flag.is_empty() || pair.response.is_empty() {
                return Err(invalid("alignment.edge_pairs", "flag and response must be non-empty"));
            }
            if !seen.insert((pair.flag.as_str(), pair.response.as_str())) {
                return Err(invalid(
                    "alignment.edge_pairs",
                    format!("duplicate pair {} -> {}", pair.flag, pair.response),
                ));
            }
        }
        if self.null_model.block_size == 0 {
            return Err(invalid("null_model.block_size", "must be at least 1"));
        }
        if self.null_model.n_shuffles == 0 {
            return Err(invalid("null_model.n_shuffles", "must be at least 1"));
        }
        if self.stability.window < 2 {
            return Err(invalid("stability.window", "must be at least 2"));
        }
        if self.stability.step == 0 {
            return Err(invalid("stability.step", "must be at least 1"));
        }
        if !self.stability.ridge.is_finite() || self.stability.ridge < 0.0 {
            return Err(invalid("stability.ridge", "must be finite and non-negative"));
        }
        if self.anchors.lag_pre < 0 || self.anchors.lag_post < 0 {
            return Err(invalid("anchors", "lag_pre and lag_post must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.anchors.threshold_quantile) {
            return Err(invalid(
                "anchors.threshold_quantile",
                "must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}
