//! Counterfactual trajectories around anchor times: observed values before
//! the anchor, the recursion from the observed state at `anchor - 1` after.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use lagchain_core::config::AnchorConfig;
use lagchain_core::errors::{LagchainResult, SimulationError};
use lagchain_core::models::ResultTable;
use lagchain_core::series::{Panel, UnitId, UnitSeries};
use lagchain_core::stats::nan_mean;
use lagchain_core::structural::AblationSpec;
use lagchain_core::traits::{Cancellable, CancellationToken, DriverSource, ObservedDriver};

use crate::anchors::AnchorEligibility;
use crate::simulator::ChainSimulator;

/// One anchor's window, rows for lags `-lag_pre..=lag_post`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorWindow {
    pub unit: UnitId,
    pub anchor: i64,
    pub lags: Vec<i64>,
    pub states: Vec<Vec<f64>>,
}

/// Simulate one anchor window. Pre-anchor lags carry the observed node
/// values (NaN where a row is absent); lags `0..=lag_post` are simulated.
pub fn simulate_anchor_window(
    simulator: &ChainSimulator,
    series: &UnitSeries,
    anchor: i64,
    lag_pre: i64,
    lag_post: i64,
    driver: &dyn DriverSource,
    ablation: &AblationSpec,
) -> LagchainResult<AnchorWindow> {
    let nodes = simulator.nodes();
    let initial = series
        .state_at(anchor - 1, nodes)
        .ok_or_else(|| SimulationError::MissingState {
            unit: series.unit().to_string(),
            t: anchor - 1,
            what: "state before anchor".to_string(),
        })?;

    let mut lags = Vec::new();
    let mut states = Vec::new();
    for h in -lag_pre..0 {
        lags.push(h);
        states.push(
            series
                .row_at(anchor + h, nodes)
                .unwrap_or_else(|| vec![f64::NAN; nodes.len()]),
        );
    }
    let trajectory = simulator.simulate(series, &initial, anchor..=anchor + lag_post, driver, ablation)?;
    for (t, state) in trajectory.times.into_iter().zip(trajectory.states) {
        lags.push(t - anchor);
        states.push(state);
    }
    Ok(AnchorWindow {
        unit: series.unit().clone(),
        anchor,
        lags,
        states,
    })
}

/// Per-lag mean of one scenario's windows across all kept anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMeanRow {
    pub run_tag: String,
    pub lag: i64,
    pub n: usize,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// Runs scenarios over every eligible anchor and averages per lag.
pub struct AnchorWindowRunner {
    simulator: ChainSimulator,
    driver: Arc<dyn DriverSource>,
    lag_pre: i64,
    lag_post: i64,
    parallel: bool,
}

impl AnchorWindowRunner {
    pub fn new(simulator: ChainSimulator, anchors: &AnchorConfig, parallel: bool) -> Self {
        let driver = Arc::new(ObservedDriver::new(simulator.config().exogenous()));
        Self {
            simulator,
            driver,
            lag_pre: anchors.lag_pre,
            lag_post: anchors.lag_post,
            parallel,
        }
    }

    pub fn with_driver(mut self, driver: Arc<dyn DriverSource>) -> Self {
        self.driver = driver;
        self
    }

    pub fn lags(&self) -> Vec<i64> {
        (-self.lag_pre..=self.lag_post).collect()
    }

    /// Mean window of one scenario.
    pub fn run_spec(
        &self,
        panel: &Panel,
        eligibility: &AnchorEligibility,
        spec: &AblationSpec,
        cancel: &CancellationToken,
    ) -> LagchainResult<ResultTable<WindowMeanRow>> {
        eligibility.require_any()?;
        let nodes = self.simulator.nodes();
        let lags = self.lags();
        // per lag, per node: samples across anchors
        let mut samples: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); nodes.len()]; lags.len()];
        let mut n = 0;

        for (unit, anchors) in &eligibility.kept {
            let Some(series) = panel.unit(unit) else {
                continue;
            };
            for &anchor in anchors {
                cancel.check()?;
                let window = simulate_anchor_window(
                    &self.simulator,
                    series,
                    anchor,
                    self.lag_pre,
                    self.lag_post,
                    self.driver.as_ref(),
                    spec,
                )?;
                for (row, state) in samples.iter_mut().zip(&window.states) {
                    for (cell, v) in row.iter_mut().zip(state) {
                        cell.push(*v);
                    }
                }
                n += 1;
            }
        }

        let rows = lags
            .iter()
            .zip(&samples)
            .map(|(&lag, per_node)| WindowMeanRow {
                run_tag: spec.name.clone(),
                lag,
                n,
                values: nodes
                    .iter()
                    .cloned()
                    .zip(per_node.iter().map(|s| nan_mean(s)))
                    .collect(),
            })
            .collect();
        tracing::info!(run_tag = %spec.name, anchors = n, "anchor windows averaged");
        Ok(ResultTable::new(format!("window_{}", spec.name), rows))
    }

    /// Validate every spec, then average each scenario's windows.
    pub fn run(
        &self,
        panel: &Panel,
        eligibility: &AnchorEligibility,
        specs: &[AblationSpec],
        cancel: &CancellationToken,
    ) -> LagchainResult<Vec<ResultTable<WindowMeanRow>>> {
        for spec in specs {
            spec.validate_against(self.simulator.config())?;
        }
        if self.parallel {
            specs
                .par_iter()
                .map(|spec| self.run_spec(panel, eligibility, spec, cancel))
                .collect()
        } else {
            specs
                .iter()
                .map(|spec| self.run_spec(panel, eligibility, spec, cancel))
                .collect()
        }
    }
}
