use std::ops::RangeInclusive;

use rayon::prelude::*;

use lagchain_core::errors::{AlignError, LagchainResult, SchemaError};
use lagchain_core::models::ResultTable;
use lagchain_core::series::UnitSeries;
use lagchain_core::stats::{diff, pearson, zscore};
use lagchain_core::traits::{Cancellable, CancellationToken};

use crate::event_null::NullCurveRow;
use crate::generator::NullModelGenerator;
use crate::shuffle::permute_within_blocks;

/// Pearson correlation of `x[t]` with `y[t + lag]` over the overlapping
/// positions, and the number of finite pairs used. Positive lags mean the
/// response follows the driver.
pub fn corr_at_lag(x: &[f64], y: &[f64], lag: i64) -> (f64, usize) {
    let n = x.len().min(y.len());
    let k = usize::try_from(lag.unsigned_abs()).unwrap_or(usize::MAX);
    if k >= n {
        return (f64::NAN, 0);
    }
    let (a, b) = if lag >= 0 {
        (&x[..n - k], &y[k..n])
    } else {
        (&x[k..n], &y[..n - k])
    };
    pearson(a, b)
}

fn prepare(values: &[f64], difference: bool) -> Vec<f64> {
    if difference {
        zscore(&diff(values))
    } else {
        zscore(values)
    }
}

impl NullModelGenerator {
    /// Lagged correlation of driver and response against the mean over
    /// `n_shuffles` surrogates whose response is permuted inside
    /// positional blocks. Both series are z-scored, after first
    /// differencing when `difference` is set. Lags with fewer than three
    /// finite pairs or no variance report NaN.
    pub fn lagged_correlation(
        &self,
        driver: &[f64],
        response: &[f64],
        lags: RangeInclusive<i64>,
        difference: bool,
        cancel: &CancellationToken,
    ) -> LagchainResult<Vec<NullCurveRow>> {
        if driver.len() != response.len() {
            return Err(AlignError::LengthMismatch {
                left: driver.len(),
                right: response.len(),
            }
            .into());
        }
        if lags.is_empty() {
            return Err(AlignError::InvalidLagWindow {
                lag_min: *lags.start(),
                lag_max: *lags.end(),
            }
            .into());
        }
        let x = prepare(driver, difference);
        let y = prepare(response, difference);
        let lags: Vec<i64> = lags.collect();

        let replicate = |r: usize| -> LagchainResult<Vec<(f64, usize)>> {
            cancel.check()?;
            let mut rng = self.replicate_rng(r);
            let surrogate = permute_within_blocks(&y, self.block_size, &mut rng)?;
            Ok(lags.iter().map(|&lag| corr_at_lag(&x, &surrogate, lag)).collect())
        };
        let replicates: Vec<Vec<(f64, usize)>> = if self.parallel {
            (0..self.n_shuffles)
                .into_par_iter()
                .map(replicate)
                .collect::<LagchainResult<_>>()?
        } else {
            (0..self.n_shuffles).map(replicate).collect::<LagchainResult<_>>()?
        };

        let rows = lags
            .iter()
            .enumerate()
            .map(|(slot, &lag)| {
                let (mean_ordered, n_ordered) = corr_at_lag(&x, &y, lag);
                let (sum, finite, pairs) = replicates.iter().map(|r| r[slot]).fold(
                    (0.0, 0usize, 0usize),
                    |(sum, finite, pairs), (r, n)| {
                        if r.is_finite() {
                            (sum + r, finite + 1, pairs + n)
                        } else {
                            (sum, finite, pairs + n)
                        }
                    },
                );
                let mean_shuffled = if finite == 0 { f64::NAN } else { sum / finite as f64 };
                NullCurveRow {
                    lag,
                    mean_ordered,
                    mean_shuffled,
                    delta: mean_ordered - mean_shuffled,
                    n_ordered,
                    n_shuffled: pairs,
                }
            })
            .collect();
        Ok(rows)
    }

    /// `lagged_correlation` over two columns of one unit.
    pub fn lagged_correlation_columns(
        &self,
        series: &UnitSeries,
        driver: &str,
        response: &str,
        lags: RangeInclusive<i64>,
        difference: bool,
        cancel: &CancellationToken,
    ) -> LagchainResult<ResultTable<NullCurveRow>> {
        SchemaError::check_columns(
            &format!("unit {}", series.unit()),
            &[driver, response],
            |c| series.has_column(c),
        )?;
        let x = series.column(driver).unwrap_or_default();
        let y = series.column(response).unwrap_or_default();
        let rows = self.lagged_correlation(x, y, lags, difference, cancel)?;
        tracing::info!(
            unit = %series.unit(),
            driver,
            response,
            replicates = self.n_shuffles,
            "correlation null finished"
        );
        Ok(ResultTable::new(format!("corr_null_{driver}_{response}"), rows))
    }
}
