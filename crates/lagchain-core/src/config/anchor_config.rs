use serde::{Deserialize, Serialize};

use super::defaults;

/// Anchor-window counterfactual configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Observed steps kept before each anchor.
    pub lag_pre: i64,
    /// Simulated steps after each anchor.
    pub lag_post: i64,
    /// Quantile of first differences below which a step is flagged as an anchor.
    pub threshold_quantile: f64,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            lag_pre: defaults::DEFAULT_ANCHOR_LAG_PRE,
            lag_post: defaults::DEFAULT_ANCHOR_LAG_POST,
            threshold_quantile: defaults::DEFAULT_THRESHOLD_QUANTILE,
        }
    }
}
