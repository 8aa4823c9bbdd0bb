use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lagchain_core::constants::{BOOTSTRAP_HI_QUANTILE, BOOTSTRAP_LO_QUANTILE, CANCEL_CHECK_INTERVAL};
use lagchain_core::errors::LagchainResult;
use lagchain_core::stats::quantile_sorted;
use lagchain_core::traits::{Cancellable, CancellationToken};

/// Seed of the stream used at `lag`: `base + lag`, wrapping.
pub fn lag_seed(base: u64, lag: i64) -> u64 {
    base.wrapping_add_signed(lag)
}

/// Percentile band `(lo, hi)` of `boot_n` resample means of `values`, each
/// resample drawn with replacement at the sample's own size. `(NaN, NaN)`
/// for an empty sample or `boot_n == 0`.
pub fn bootstrap_band(
    values: &[f64],
    boot_n: usize,
    seed: u64,
    cancel: &CancellationToken,
) -> LagchainResult<(f64, f64)> {
    let n = values.len();
    if n == 0 || boot_n == 0 {
        return Ok((f64::NAN, f64::NAN));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut means = Vec::with_capacity(boot_n);
    for b in 0..boot_n {
        if b % CANCEL_CHECK_INTERVAL == 0 {
            cancel.check()?;
        }
        let sum: f64 = (0..n).map(|_| values[rng.gen_range(0..n)]).sum();
        means.push(sum / n as f64);
    }
    means.sort_by(f64::total_cmp);
    Ok((
        quantile_sorted(&means, BOOTSTRAP_LO_QUANTILE),
        quantile_sorted(&means, BOOTSTRAP_HI_QUANTILE),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_lags_get_distinct_seeds() {
        assert_eq!(lag_seed(13, -1), 12);
        assert_eq!(lag_seed(0, -1), u64::MAX);
        assert_ne!(lag_seed(13, 2), lag_seed(13, -2));
    }

    #[test]
    fn constant_sample_has_degenerate_band() {
        let band = bootstrap_band(&[2.5; 8], 50, 1, &CancellationToken::new()).unwrap();
        assert_eq!(band, (2.5, 2.5));
    }
}
