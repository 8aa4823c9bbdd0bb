use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use lagchain_core::config::AlignmentConfig;
use lagchain_core::errors::{AlignError, LagchainResult};
use lagchain_core::models::{LagCurve, LagPoint, OnsetSet};
use lagchain_core::series::{Panel, UnitSeries};
use lagchain_core::traits::{Cancellable, CancellationToken};

use crate::bootstrap::{bootstrap_band, lag_seed};

/// How a trigger's response at `t0 + lag` becomes a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// The raw value.
    #[default]
    Mean,
    /// `max(0, value - baseline)` with the baseline taken at `t0 - 1`, or
    /// at `t0` when `t0 - 1` is absent or non-finite. The response is
    /// treated as a stock that only accumulates, so drops clip to zero.
    CumulativeRebased,
}

/// A resolved trigger: its unit series, onset and (rebased mode) baseline.
struct Anchor<'a> {
    series: &'a UnitSeries,
    t0: i64,
    baseline: f64,
}

/// Per-lag aggregation of a response column around trigger times.
#[derive(Debug, Clone)]
pub struct LagAligner {
    lag_min: i64,
    lag_max: i64,
    boot_n: usize,
    seed: u64,
    parallel: bool,
}

impl LagAligner {
    pub fn new(lag_min: i64, lag_max: i64) -> Result<Self, AlignError> {
        if lag_min > lag_max {
            return Err(AlignError::InvalidLagWindow { lag_min, lag_max });
        }
        Ok(Self {
            lag_min,
            lag_max,
            boot_n: 0,
            seed: 0,
            parallel: true,
        })
    }

    /// Window and bootstrap settings from config.
    pub fn from_config(config: &AlignmentConfig) -> Result<Self, AlignError> {
        Ok(Self::new(config.lag_min, config.lag_max)?.with_bootstrap(config.boot_n, config.seed))
    }

    /// Enable percentile bands from `boot_n` resamples per lag.
    pub fn with_bootstrap(mut self, boot_n: usize, seed: u64) -> Self {
        self.boot_n = boot_n;
        self.seed = seed;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn lags(&self) -> Vec<i64> {
        (self.lag_min..=self.lag_max).collect()
    }

    fn anchors<'a>(&self, panel: &'a Panel, column: &str, triggers: &OnsetSet, mode: AlignMode) -> Vec<Anchor<'a>> {
        let mut anchors = Vec::with_capacity(triggers.total());
        for (unit, onsets) in &triggers.by_unit {
            let Some(series) = panel.unit(unit) else {
                continue;
            };
            for &t0 in onsets {
                let baseline = match mode {
                    AlignMode::Mean => 0.0,
                    AlignMode::CumulativeRebased => match series.finite_value(column, t0 - 1) {
                        Some(b) => b,
                        None => series.value(column, t0).unwrap_or(f64::NAN),
                    },
                };
                // a trigger without a usable baseline contributes nothing
                if baseline.is_finite() {
                    anchors.push(Anchor { series, t0, baseline });
                }
            }
        }
        anchors
    }

    fn samples_for(anchors: &[Anchor<'_>], column: &str, lag: i64, mode: AlignMode) -> Vec<f64> {
        anchors
            .iter()
            .filter_map(|a| a.series.finite_value(column, a.t0 + lag).map(|v| (a, v)))
            .map(|(a, v)| match mode {
                AlignMode::Mean => v,
                AlignMode::CumulativeRebased => (v - a.baseline).max(0.0),
            })
            .collect()
    }

    /// Raw per-trigger samples at one lag.
    pub fn samples(&self, panel: &Panel, column: &str, triggers: &OnsetSet, mode: AlignMode, lag: i64) -> Vec<f64> {
        Self::samples_for(&self.anchors(panel, column, triggers, mode), column, lag, mode)
    }

    /// Align `column` around `triggers`. Lags without a finite sample
    /// report NaN with `n = 0`. Each lag's bootstrap stream is seeded from
    /// `seed + lag`, so results do not depend on scheduling.
    pub fn align(
        &self,
        panel: &Panel,
        column: &str,
        triggers: &OnsetSet,
        mode: AlignMode,
        cancel: &CancellationToken,
    ) -> LagchainResult<LagCurve> {
        panel.require_columns(&[column])?;
        let anchors = self.anchors(panel, column, triggers, mode);

        let point = |lag: i64| -> LagchainResult<LagPoint> {
            cancel.check()?;
            let values = Self::samples_for(&anchors, column, lag, mode);
            if values.is_empty() {
                return Ok(LagPoint::empty(lag));
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let (lo, hi) = bootstrap_band(&values, self.boot_n, lag_seed(self.seed, lag), cancel)?;
            Ok(LagPoint {
                lag,
                mean,
                lo,
                hi,
                n: values.len(),
            })
        };

        let lags = self.lags();
        let points: Vec<LagPoint> = if self.parallel {
            lags.par_iter().map(|&lag| point(lag)).collect::<LagchainResult<_>>()?
        } else {
            lags.iter().map(|&lag| point(lag)).collect::<LagchainResult<_>>()?
        };

        let degraded = points.iter().filter(|p| p.is_degraded()).count();
        tracing::debug!(
            column,
            mode = ?mode,
            triggers = anchors.len(),
            lags = points.len(),
            degraded,
            "lag aligned"
        );
        Ok(LagCurve::new(points))
    }
}
