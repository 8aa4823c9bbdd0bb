use std::ops::RangeInclusive;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use lagchain_core::errors::{AlignError, LagchainResult, SchemaError};
use lagchain_core::models::ResultTable;
use lagchain_core::series::{Panel, UnitSeries};
use lagchain_core::traits::{Cancellable, CancellationToken};
use lagchain_events::rising_edges;

use crate::generator::NullModelGenerator;
use crate::shuffle::block_shuffle;

/// One lag of an ordered-vs-shuffled comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullCurveRow {
    pub lag: i64,
    pub mean_ordered: f64,
    pub mean_shuffled: f64,
    /// `mean_ordered - mean_shuffled`; NaN when either side is.
    pub delta: f64,
    pub n_ordered: usize,
    /// Pooled over every shuffle replicate.
    pub n_shuffled: usize,
}

/// Per-lag response sums over onset times.
#[derive(Debug, Clone)]
struct LagAccumulator {
    num: Vec<f64>,
    den: Vec<usize>,
}

impl LagAccumulator {
    fn new(n_lags: usize) -> Self {
        Self {
            num: vec![0.0; n_lags],
            den: vec![0; n_lags],
        }
    }

    /// Adds the response at `t0 + lag` for every onset position whose
    /// response is finite there.
    fn add(&mut self, series: &UnitSeries, response: &str, indicator: &[f64], lags: &RangeInclusive<i64>) {
        let times = series.times();
        for (i, _) in indicator.iter().enumerate().filter(|(_, o)| **o != 0.0) {
            for (slot, lag) in lags.clone().enumerate() {
                if let Some(v) = series.finite_value(response, times[i] + lag) {
                    self.num[slot] += v;
                    self.den[slot] += 1;
                }
            }
        }
    }

    fn merge(mut self, other: &Self) -> Self {
        for (slot, (num, den)) in other.num.iter().zip(&other.den).enumerate() {
            self.num[slot] += num;
            self.den[slot] += den;
        }
        self
    }

    fn mean(&self, slot: usize) -> f64 {
        match self.den[slot] {
            0 => f64::NAN,
            den => self.num[slot] / den as f64,
        }
    }
}

/// Onset indicator of one unit: 1 at rising edges of `flag`, else 0.
fn onset_indicator(series: &UnitSeries, flag: &str) -> Result<Vec<f64>, SchemaError> {
    let flags = series.column(flag).ok_or_else(|| SchemaError::MissingColumns {
        table: format!("unit {}", series.unit()),
        columns: vec![flag.to_string()],
    })?;
    let mut indicator = vec![0.0; flags.len()];
    for i in rising_edges(flags) {
        indicator[i] = 1.0;
    }
    Ok(indicator)
}

impl NullModelGenerator {
    /// Compares onset-locked means of `response` against the same
    /// aggregation on block-shuffled onset indicators. Sums and counts are
    /// pooled across units (and, for the null side, across replicates)
    /// before dividing; a lag without a finite sample reports NaN.
    pub fn ordered_vs_shuffled(
        &self,
        panel: &Panel,
        flag: &str,
        response: &str,
        lags: RangeInclusive<i64>,
        cancel: &CancellationToken,
    ) -> LagchainResult<ResultTable<NullCurveRow>> {
        if lags.is_empty() {
            return Err(AlignError::InvalidLagWindow {
                lag_min: *lags.start(),
                lag_max: *lags.end(),
            }
            .into());
        }
        panel.require_columns(&[flag, response])?;
        let n_lags = lags.clone().count();

        let indicators: Vec<(&UnitSeries, Vec<f64>)> = panel
            .units()
            .map(|series| onset_indicator(series, flag).map(|indicator| (series, indicator)))
            .collect::<Result<_, SchemaError>>()?;

        let mut ordered = LagAccumulator::new(n_lags);
        for (series, indicator) in &indicators {
            ordered.add(series, response, indicator, &lags);
        }

        let replicate = |r: usize| -> LagchainResult<LagAccumulator> {
            cancel.check()?;
            let mut rng = self.replicate_rng(r);
            let mut acc = LagAccumulator::new(n_lags);
            for (series, indicator) in &indicators {
                // units without onsets draw nothing from the stream
                if indicator.iter().all(|o| *o == 0.0) {
                    continue;
                }
                let shuffled = block_shuffle(indicator, series.times(), self.block_size, self.scheme, &mut rng)?;
                acc.add(series, response, &shuffled, &lags);
            }
            Ok(acc)
        };

        let replicates: Vec<LagAccumulator> = if self.parallel {
            (0..self.n_shuffles)
                .into_par_iter()
                .map(replicate)
                .collect::<LagchainResult<_>>()?
        } else {
            (0..self.n_shuffles).map(replicate).collect::<LagchainResult<_>>()?
        };
        let shuffled = replicates
            .iter()
            .fold(LagAccumulator::new(n_lags), |acc, r| acc.merge(r));

        let rows: Vec<NullCurveRow> = lags
            .enumerate()
            .map(|(slot, lag)| {
                let mean_ordered = ordered.mean(slot);
                let mean_shuffled = shuffled.mean(slot);
                NullCurveRow {
                    lag,
                    mean_ordered,
                    mean_shuffled,
                    delta: mean_ordered - mean_shuffled,
                    n_ordered: ordered.den[slot],
                    n_shuffled: shuffled.den[slot],
                }
            })
            .collect();

        let onsets = indicators
            .iter()
            .map(|(_, ind)| ind.iter().filter(|o| **o != 0.0).count())
            .sum::<usize>();
        tracing::info!(
            flag,
            response,
            onsets,
            replicates = self.n_shuffles,
            block_size = self.block_size,
            "shuffle finished"
        );
        Ok(ResultTable::new(format!("null_{flag}_{response}"), rows))
    }
}
