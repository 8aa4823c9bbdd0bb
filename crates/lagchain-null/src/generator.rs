use rand::rngs::StdRng;
use rand::SeedableRng;

use lagchain_core::config::{BlockScheme, NullModelConfig};
use lagchain_core::errors::AlignError;

/// Block-shuffle null model settings. Replicate `r` draws from a stream
/// seeded with `seed + r`, so a replicate's surrogate does not depend on
/// how many other replicates run or in which order.
#[derive(Debug, Clone)]
pub struct NullModelGenerator {
    pub(crate) block_size: usize,
    pub(crate) n_shuffles: usize,
    pub(crate) seed: u64,
    pub(crate) scheme: BlockScheme,
    pub(crate) parallel: bool,
}

impl NullModelGenerator {
    pub fn new(block_size: usize, n_shuffles: usize, seed: u64) -> Result<Self, AlignError> {
        if block_size == 0 {
            return Err(AlignError::InvalidBlockSize);
        }
        Ok(Self {
            block_size,
            n_shuffles,
            seed,
            scheme: BlockScheme::default(),
            parallel: true,
        })
    }

    pub fn from_config(config: &NullModelConfig) -> Result<Self, AlignError> {
        Ok(Self::new(config.block_size, config.n_shuffles, config.seed)?.with_scheme(config.block_scheme))
    }

    pub fn with_scheme(mut self, scheme: BlockScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Same settings on another base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn n_shuffles(&self) -> usize {
        self.n_shuffles
    }

    pub fn scheme(&self) -> BlockScheme {
        self.scheme
    }

    /// Random stream of one replicate.
    pub fn replicate_rng(&self, replicate: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(replicate as u64))
    }

    /// One surrogate of `flags` for replicate `replicate`.
    pub fn shuffle(&self, flags: &[f64], times: &[i64], replicate: usize) -> Result<Vec<f64>, AlignError> {
        let mut rng = self.replicate_rng(replicate);
        crate::shuffle::block_shuffle(flags, times, self.block_size, self.scheme, &mut rng)
    }
}
