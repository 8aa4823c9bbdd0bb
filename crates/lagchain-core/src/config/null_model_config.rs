use serde::{Deserialize, Serialize};

use super::defaults;

/// How a series is cut into shuffle blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockScheme {
    /// Consecutive runs of `block_size` positions.
    Positional,
    /// Blocks keyed by `t.div_euclid(block_size)` on the unit's time index,
    /// so block edges fall on the clock whatever time a unit starts at.
    #[default]
    TimeAligned,
}

/// Null-model (block shuffle) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NullModelConfig {
    pub block_size: usize,
    /// Shuffle replicates pooled into the null curve.
    pub n_shuffles: usize,
    pub seed: u64,
    pub block_scheme: BlockScheme,
}

impl Default for NullModelConfig {
    fn default() -> Self {
        Self {
            block_size: defaults::DEFAULT_BLOCK_SIZE,
            n_shuffles: defaults::DEFAULT_N_SHUFFLES,
            seed: defaults::DEFAULT_NULL_SEED,
            block_scheme: BlockScheme::default(),
        }
    }
}
