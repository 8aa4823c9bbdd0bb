use serde::{Deserialize, Serialize};

use super::defaults;

/// Rolling operator-stability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Steps per rolling window.
    pub window: usize,
    /// Stride between window starts.
    pub step: usize,
    /// Ridge penalty added to the normal equations.
    pub ridge: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            window: defaults::DEFAULT_STABILITY_WINDOW,
            step: defaults::DEFAULT_STABILITY_STEP,
            ridge: defaults::DEFAULT_RIDGE,
        }
    }
}
