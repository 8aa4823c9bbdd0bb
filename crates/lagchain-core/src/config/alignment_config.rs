use serde::{Deserialize, Serialize};

use super::defaults;

/// Lag alignment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// First lag of the symmetric window (inclusive, usually negative).
    pub lag_min: i64,
    /// Last lag of the window (inclusive).
    pub lag_max: i64,
    /// Bootstrap resamples per lag. 0 disables the confidence band.
    pub boot_n: usize,
    /// Base seed; each lag derives its own stream from `seed + lag`.
    pub seed: u64,
    /// Lag at which paired curves are rebased onto each other.
    pub reference_lag: i64,
    /// Flag column whose rising edges trigger alignment.
    pub trigger_flag: String,
    /// Response columns aligned around each trigger.
    pub response_columns: Vec<String>,
    /// Parent flag / child response pairs, one curve and null per pair.
    /// When empty, `trigger_flag` is paired with every response column.
    pub edge_pairs: Vec<EdgePair>,
}

/// One edge of the chain as seen by the aligner: onsets of the parent's
/// `flag` against the child's `response` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePair {
    pub flag: String,
    pub response: String,
}

impl EdgePair {
    pub fn new(flag: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            flag: flag.into(),
            response: response.into(),
        }
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            lag_min: defaults::DEFAULT_LAG_MIN,
            lag_max: defaults::DEFAULT_LAG_MAX,
            boot_n: defaults::DEFAULT_BOOT_N,
            seed: defaults::DEFAULT_ALIGN_SEED,
            reference_lag: defaults::DEFAULT_REFERENCE_LAG,
            trigger_flag: defaults::DEFAULT_TRIGGER_FLAG.to_string(),
            response_columns: Vec::new(),
            edge_pairs: Vec::new(),
        }
    }
}

impl AlignmentConfig {
    /// Lags covered by the window, in ascending order.
    pub fn lags(&self) -> Vec<i64> {
        (self.lag_min..=self.lag_max).collect()
    }

    /// Seed of the pair at `index`: the first pair keeps `seed`, later
    /// pairs are offset by their position.
    pub fn pair_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}
