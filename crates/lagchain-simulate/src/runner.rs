use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;

use lagchain_core::config::{InitialStatePolicy, SimulationConfig};
use lagchain_core::errors::{ConfigValidationError, LagchainResult, SimulationError};
use lagchain_core::models::{ResultTable, SimulatedRow};
use lagchain_core::series::{Panel, UnitSeries};
use lagchain_core::structural::{AblationSpec, StructuralConfig};
use lagchain_core::traits::{Cancellable, CancellationToken, DriverSource, ObservedDriver};

use crate::simulator::ChainSimulator;

/// Runs a catalogue of ablation scenarios over every unit of a panel and
/// emits one `run_tag`-tagged table per scenario, in catalogue order.
///
/// Each unit is simulated over its full time range: the first row is the
/// initial state (per `InitialStatePolicy`), every later row comes from the
/// recursion.
pub struct AblationRunner {
    simulator: ChainSimulator,
    settings: SimulationConfig,
    driver: Arc<dyn DriverSource>,
}

impl AblationRunner {
    /// Runner driven by the observed exogenous column.
    pub fn new(config: &StructuralConfig, settings: SimulationConfig) -> LagchainResult<Self> {
        let driver = Arc::new(ObservedDriver::new(config.exogenous()));
        Ok(Self {
            simulator: ChainSimulator::new(config)?,
            settings,
            driver,
        })
    }

    /// Replace the driver, e.g. with `ConstantDriver(0.0)` for `do(A = 0)`.
    pub fn with_driver(mut self, driver: Arc<dyn DriverSource>) -> Self {
        self.driver = driver;
        self
    }

    pub fn simulator(&self) -> &ChainSimulator {
        &self.simulator
    }

    /// Every spec must reference only existing keys; checked before any run.
    pub fn validate(&self, specs: &[AblationSpec]) -> Result<(), ConfigValidationError> {
        specs
            .iter()
            .try_for_each(|spec| spec.validate_against(self.simulator.config()))
    }

    fn initial_state(&self, series: &UnitSeries, t0: i64) -> LagchainResult<Vec<f64>> {
        let config = self.simulator.config();
        match self.settings.initial_state {
            InitialStatePolicy::Observed => series.row_at(t0, config.nodes()).ok_or_else(|| {
                SimulationError::MissingState {
                    unit: series.unit().to_string(),
                    t: t0,
                    what: "observed initial state".to_string(),
                }
                .into()
            }),
            InitialStatePolicy::Baseline => {
                let mut state = vec![self.driver.driver_at(series, t0).unwrap_or(f64::NAN)];
                for node in config.downstream() {
                    state.push(config.require_baseline(node)?);
                }
                Ok(state)
            }
        }
    }

    /// Simulate one unit under one scenario.
    pub fn run_unit(&self, series: &UnitSeries, spec: &AblationSpec) -> LagchainResult<Vec<SimulatedRow>> {
        let (Some(t0), Some(t_end)) = (series.t_min(), series.t_max()) else {
            return Err(SimulationError::EmptyUnit {
                unit: series.unit().to_string(),
            }
            .into());
        };
        let initial = self.initial_state(series, t0)?;
        let trajectory =
            self.simulator
                .simulate(series, &initial, (t0 + 1)..=t_end, self.driver.as_ref(), spec)?;

        let nodes = self.simulator.nodes();
        let row = |t: i64, state: &[f64]| SimulatedRow {
            unit: series.unit().clone(),
            t,
            run_tag: spec.name.clone(),
            values: nodes.iter().cloned().zip(state.iter().copied()).collect::<BTreeMap<_, _>>(),
        };
        let mut rows = Vec::with_capacity(series.len());
        rows.push(row(t0, &initial));
        for (t, state) in trajectory.times.iter().zip(&trajectory.states) {
            rows.push(row(*t, state));
        }
        Ok(rows)
    }

    /// One scenario over every unit.
    pub fn run_spec(
        &self,
        panel: &Panel,
        spec: &AblationSpec,
        cancel: &CancellationToken,
    ) -> LagchainResult<ResultTable<SimulatedRow>> {
        let mut rows = Vec::with_capacity(panel.n_rows());
        for series in panel.units() {
            cancel.check()?;
            rows.extend(self.run_unit(series, spec)?);
        }
        tracing::info!(
            run_tag = %spec.name,
            units = panel.len(),
            rows = rows.len(),
            "scenario simulated"
        );
        Ok(ResultTable::new(format!("simulated_{}", spec.name), rows))
    }

    /// Validate every spec, then run them (in parallel when configured).
    pub fn run(
        &self,
        panel: &Panel,
        specs: &[AblationSpec],
        cancel: &CancellationToken,
    ) -> LagchainResult<Vec<ResultTable<SimulatedRow>>> {
        self.validate(specs)?;
        panel.require_columns(&self.required_columns())?;
        if self.settings.parallel {
            specs
                .par_iter()
                .map(|spec| self.run_spec(panel, spec, cancel))
                .collect()
        } else {
            specs
                .iter()
                .map(|spec| self.run_spec(panel, spec, cancel))
                .collect()
        }
    }

    /// State columns under the observed policy, plus whatever the driver reads.
    fn required_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = match self.settings.initial_state {
            InitialStatePolicy::Observed => self.simulator.nodes().iter().map(String::as_str).collect(),
            InitialStatePolicy::Baseline => Vec::new(),
        };
        if let Some(column) = self.driver.column() {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }
}
