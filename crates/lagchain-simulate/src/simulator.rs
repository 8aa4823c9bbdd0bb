use std::ops::RangeInclusive;

use lagchain_core::errors::{ConfigValidationError, LagchainResult, SimulationError};
use lagchain_core::series::{UnitId, UnitSeries};
use lagchain_core::structural::{AblationSpec, Edge, StructuralConfig};
use lagchain_core::traits::DriverSource;

/// Inbound term of a downstream node, resolved to node positions.
#[derive(Debug, Clone)]
struct Term {
    parent: usize,
    kappa: f64,
    edge: Edge,
}

/// Simulated states of one unit, one row per step, columns in node order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub unit: UnitId,
    pub times: Vec<i64>,
    pub states: Vec<Vec<f64>>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Values of node position `node` across steps.
    pub fn column(&self, node: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[node]).collect()
    }

    pub fn state_at(&self, t: i64) -> Option<&[f64]> {
        let pos = self.times.binary_search(&t).ok()?;
        Some(&self.states[pos])
    }
}

/// The discrete-time structural recursion
///
/// `x_n(t) = b_n + Σ κ(p, n) · x_p(t-1)` over non-ablated inbound edges,
///
/// with the exogenous node read from a `DriverSource`. Parents always enter
/// at their previous-step value, skip edges included. Stateless: one
/// simulator serves any number of scenarios over the same inputs.
#[derive(Debug, Clone)]
pub struct ChainSimulator {
    config: StructuralConfig,
    baselines: Vec<f64>,
    inbound: Vec<Vec<Term>>,
}

impl ChainSimulator {
    pub fn new(config: &StructuralConfig) -> LagchainResult<Self> {
        let nodes = config.nodes();
        let mut baselines = vec![0.0; nodes.len()];
        let mut inbound = vec![Vec::new(); nodes.len()];
        for (i, node) in nodes.iter().enumerate().skip(1) {
            baselines[i] = config.require_baseline(node)?;
            for edge in config.inbound(node) {
                let parent = config
                    .node_index(&edge.parent)
                    .ok_or_else(|| ConfigValidationError::UnknownNode {
                        node: edge.parent.clone(),
                    })?;
                inbound[i].push(Term {
                    parent,
                    kappa: config.require_coefficient(edge)?,
                    edge: edge.clone(),
                });
            }
        }
        Ok(Self {
            config: config.clone(),
            baselines,
            inbound,
        })
    }

    pub fn config(&self) -> &StructuralConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[String] {
        self.config.nodes()
    }

    /// Active `(parent, κ)` pairs per node under `ablation`.
    fn active_terms(&self, ablation: &AblationSpec) -> Vec<Vec<(usize, f64)>> {
        self.inbound
            .iter()
            .map(|terms| {
                terms
                    .iter()
                    .filter(|term| !ablation.is_ablated(&term.edge))
                    .map(|term| (term.parent, term.kappa))
                    .collect()
            })
            .collect()
    }

    fn advance(&self, prev: &[f64], terms: &[Vec<(usize, f64)>]) -> Vec<f64> {
        let mut next = vec![f64::NAN; prev.len()];
        for i in 1..prev.len() {
            next[i] = terms[i]
                .iter()
                .fold(self.baselines[i], |acc, (p, k)| acc + k * prev[*p]);
        }
        next
    }

    /// One step from `prev` (the full state at `t-1`, exogenous entry
    /// included). The exogenous entry of the result is NaN.
    pub fn step(&self, prev: &[f64], ablation: &AblationSpec) -> Vec<f64> {
        self.advance(prev, &self.active_terms(ablation))
    }

    /// Run the recursion over `steps` starting from `initial_state`, the
    /// node vector at `steps.start() - 1`.
    ///
    /// The exogenous parent value at step `t` is `driver(t-1)`, which must be
    /// covered; otherwise the run fails with a missing-state error. The
    /// exogenous output at `t` is `driver(t)` passed through, NaN when not
    /// covered. `ablation` must only name keys present in the config.
    pub fn simulate(
        &self,
        unit: &UnitSeries,
        initial_state: &[f64],
        steps: RangeInclusive<i64>,
        driver: &dyn DriverSource,
        ablation: &AblationSpec,
    ) -> LagchainResult<Trajectory> {
        ablation.validate_against(&self.config)?;
        let width = self.nodes().len();
        let start = *steps.start();
        if initial_state.len() != width {
            return Err(SimulationError::MissingState {
                unit: unit.unit().to_string(),
                t: start - 1,
                what: format!("initial state has {} of {width} nodes", initial_state.len()),
            }
            .into());
        }

        let terms = self.active_terms(ablation);
        let mut prev = initial_state.to_vec();
        let mut times = Vec::new();
        let mut states = Vec::new();
        for t in steps {
            prev[0] = driver
                .driver_at(unit, t - 1)
                .ok_or_else(|| SimulationError::MissingState {
                    unit: unit.unit().to_string(),
                    t: t - 1,
                    what: format!("driver {}", self.config.exogenous()),
                })?;
            let mut next = self.advance(&prev, &terms);
            next[0] = driver.driver_at(unit, t).unwrap_or(f64::NAN);
            times.push(t);
            states.push(next.clone());
            prev = next;
        }
        Ok(Trajectory {
            unit: unit.unit().clone(),
            times,
            states,
        })
    }
}
