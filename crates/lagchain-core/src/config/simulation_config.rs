use serde::{Deserialize, Serialize};

use super::defaults;

/// Where a unit's starting state comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InitialStatePolicy {
    /// Observed node values at the unit's first time step.
    #[default]
    Observed,
    /// Configured baselines for every downstream node.
    Baseline,
}

/// Scenario simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_state: InitialStatePolicy,
    /// Run scenarios on the rayon pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_state: InitialStatePolicy::default(),
            parallel: defaults::DEFAULT_PARALLEL,
        }
    }
}
