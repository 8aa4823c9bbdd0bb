//! Immutable structural configuration: baselines and per-edge coefficients.

use std::collections::{BTreeMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use super::edge::Edge;
use crate::constants::DEFAULT_NODES;
use crate::errors::ConfigValidationError;

/// Baseline `b_n` and inbound coefficients `κ(p, n)` for every downstream
/// node of an ordered chain. The first node in the ordering is exogenous:
/// it is read from the input series and never simulated.
///
/// Validated on construction; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralConfig {
    nodes: Vec<String>,
    baselines: BTreeMap<String, f64>,
    coefficients: BTreeMap<Edge, f64>,
}

impl StructuralConfig {
    /// Build and validate a config.
    pub fn new(
        nodes: Vec<String>,
        baselines: BTreeMap<String, f64>,
        coefficients: BTreeMap<Edge, f64>,
    ) -> Result<Self, ConfigValidationError> {
        let config = Self {
            nodes,
            baselines,
            coefficients,
        };
        config.validate()?;
        Ok(config)
    }

    /// Start a builder over an explicit node ordering.
    pub fn builder<I, S>(nodes: I) -> StructuralConfigBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StructuralConfigBuilder {
            nodes: nodes.into_iter().map(Into::into).collect(),
            baselines: BTreeMap::new(),
            coefficients: BTreeMap::new(),
        }
    }

    /// Builder over the default `A..E` ordering.
    pub fn five_node() -> StructuralConfigBuilder {
        Self::builder(DEFAULT_NODES)
    }

    /// Declared node ordering (topological).
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// The exogenous driver node.
    pub fn exogenous(&self) -> &str {
        &self.nodes[0]
    }

    /// Nodes produced by the recursion, in topological order.
    pub fn downstream(&self) -> &[String] {
        &self.nodes[1..]
    }

    /// The last node of the ordering.
    pub fn terminal(&self) -> &str {
        &self.nodes[self.nodes.len() - 1]
    }

    pub fn node_index(&self, node: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n == node)
    }

    pub fn baseline(&self, node: &str) -> Option<f64> {
        self.baselines.get(node).copied()
    }

    pub fn coefficient(&self, edge: &Edge) -> Option<f64> {
        self.coefficients.get(edge).copied()
    }

    /// Baseline of `node`, or a `MissingKey` error naming `effects.<node>.baseline`.
    pub fn require_baseline(&self, node: &str) -> Result<f64, ConfigValidationError> {
        self.baseline(node)
            .ok_or_else(|| ConfigValidationError::MissingKey {
                key: format!("effects.{node}.baseline"),
            })
    }

    /// Coefficient of `edge`, or a `MissingKey` error naming its config key.
    pub fn require_coefficient(&self, edge: &Edge) -> Result<f64, ConfigValidationError> {
        self.coefficient(edge)
            .ok_or_else(|| ConfigValidationError::MissingKey {
                key: edge.coefficient_key(),
            })
    }

    /// All configured edges with their coefficients, ordered by edge.
    pub fn edges(&self) -> impl Iterator<Item = (&Edge, f64)> {
        self.coefficients.iter().map(|(e, k)| (e, *k))
    }

    /// Edges terminating at `node`.
    pub fn inbound(&self, node: &str) -> Vec<&Edge> {
        self.coefficients
            .keys()
            .filter(|e| e.child == node)
            .collect()
    }

    /// Configured edges between consecutive nodes of the ordering.
    pub fn main_chain(&self) -> Vec<Edge> {
        self.nodes
            .windows(2)
            .map(|pair| Edge::new(pair[0].clone(), pair[1].clone()))
            .filter(|e| self.coefficients.contains_key(e))
            .collect()
    }

    /// Validate ordering, baselines, edge direction and acyclicity.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.nodes.len() < 2 {
            return Err(ConfigValidationError::TooFewNodes {
                min: 2,
                actual: self.nodes.len(),
            });
        }
        let mut seen = HashSet::new();
        for node in &self.nodes {
            if !seen.insert(node.as_str()) {
                return Err(ConfigValidationError::DuplicateNode { node: node.clone() });
            }
        }

        for (node, value) in &self.baselines {
            if self.node_index(node).is_none() {
                return Err(ConfigValidationError::UnknownNode { node: node.clone() });
            }
            if !value.is_finite() {
                return Err(ConfigValidationError::NonFinite {
                    key: format!("effects.{node}.baseline"),
                });
            }
        }
        for node in self.downstream() {
            self.require_baseline(node)?;
        }

        for (edge, kappa) in &self.coefficients {
            for node in [&edge.parent, &edge.child] {
                if self.node_index(node).is_none() {
                    return Err(ConfigValidationError::UnknownNode { node: node.clone() });
                }
            }
            if !kappa.is_finite() {
                return Err(ConfigValidationError::NonFinite {
                    key: edge.coefficient_key(),
                });
            }
        }

        self.check_acyclic()?;

        for edge in self.coefficients.keys() {
            if edge.child == self.exogenous() {
                return Err(ConfigValidationError::ExogenousTarget {
                    edge: edge.to_string(),
                });
            }
            let (p, c) = (self.node_index(&edge.parent), self.node_index(&edge.child));
            if p >= c {
                return Err(ConfigValidationError::OrderViolation {
                    edge: edge.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_acyclic(&self) -> Result<(), ConfigValidationError> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        for idx in 0..self.nodes.len() {
            graph.add_node(idx);
        }
        for edge in self.coefficients.keys() {
            if edge.parent == edge.child {
                return Err(ConfigValidationError::CycleDetected {
                    path: edge.to_string(),
                });
            }
            if let (Some(p), Some(c)) = (self.node_index(&edge.parent), self.node_index(&edge.child)) {
                graph.add_edge(p, c, ());
            }
        }
        if let Some(scc) = tarjan_scc(&graph).into_iter().find(|scc| scc.len() > 1) {
            let path = scc
                .iter()
                .map(|idx| self.nodes[*idx].as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ConfigValidationError::CycleDetected { path });
        }
        Ok(())
    }
}

/// Incremental construction of a `StructuralConfig`.
#[derive(Debug, Clone)]
pub struct StructuralConfigBuilder {
    nodes: Vec<String>,
    baselines: BTreeMap<String, f64>,
    coefficients: BTreeMap<Edge, f64>,
}

impl StructuralConfigBuilder {
    pub fn baseline(mut self, node: impl Into<String>, value: f64) -> Self {
        self.baselines.insert(node.into(), value);
        self
    }

    /// Set the same baseline for every downstream node.
    pub fn uniform_baseline(mut self, value: f64) -> Self {
        for node in self.nodes.iter().skip(1) {
            self.baselines.insert(node.clone(), value);
        }
        self
    }

    pub fn edge(mut self, parent: impl Into<String>, child: impl Into<String>, kappa: f64) -> Self {
        self.coefficients.insert(Edge::new(parent, child), kappa);
        self
    }

    pub fn build(self) -> Result<StructuralConfig, ConfigValidationError> {
        StructuralConfig::new(self.nodes, self.baselines, self.coefficients)
    }
}
