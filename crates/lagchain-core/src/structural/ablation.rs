//! Named edge-ablation scenarios.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::config::StructuralConfig;
use super::edge::Edge;
use crate::constants::{FULL_RUN_TAG, REMOVE_ALL_RUN_TAG};
use crate::errors::ConfigValidationError;

/// A named set of edges forced to zero for one simulation run.
///
/// An ablation is a membership test: an edge contributes nothing if it is
/// listed in `edges`, if its child is listed in `zero_inbound`, or if
/// `remove_all` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AblationSpec {
    pub name: String,
    pub edges: BTreeSet<Edge>,
    pub zero_inbound: BTreeSet<String>,
    pub remove_all: bool,
}

impl AblationSpec {
    /// Scenario with nothing removed.
    pub fn full() -> Self {
        Self::named(FULL_RUN_TAG)
    }

    /// Remove a single edge, tagged `No<P>to<C>`.
    pub fn remove_edge(edge: Edge) -> Self {
        let mut spec = Self::named(edge.removal_tag());
        spec.edges.insert(edge);
        spec
    }

    /// Remove every edge terminating at `node`, tagged `None<node>`.
    pub fn remove_inbound(node: impl Into<String>) -> Self {
        let node = node.into();
        let mut spec = Self::named(format!("{REMOVE_ALL_RUN_TAG}{node}"));
        spec.zero_inbound.insert(node);
        spec
    }

    /// Remove every edge in the graph.
    pub fn remove_all() -> Self {
        let mut spec = Self::named(REMOVE_ALL_RUN_TAG);
        spec.remove_all = true;
        spec
    }

    /// Arbitrary named set of removed edges.
    pub fn custom(name: impl Into<String>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut spec = Self::named(name);
        spec.edges.extend(edges);
        spec
    }

    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edges: BTreeSet::new(),
            zero_inbound: BTreeSet::new(),
            remove_all: false,
        }
    }

    pub fn is_ablated(&self, edge: &Edge) -> bool {
        self.remove_all || self.edges.contains(edge) || self.zero_inbound.contains(&edge.child)
    }

    /// True when the scenario removes nothing.
    pub fn is_empty(&self) -> bool {
        !self.remove_all && self.edges.is_empty() && self.zero_inbound.is_empty()
    }

    /// Every key the scenario references must exist in `config`.
    pub fn validate_against(&self, config: &StructuralConfig) -> Result<(), ConfigValidationError> {
        for edge in &self.edges {
            config.require_coefficient(edge)?;
        }
        for node in &self.zero_inbound {
            if config.node_index(node).is_none() {
                return Err(ConfigValidationError::UnknownNode { node: node.clone() });
            }
            if node == config.exogenous() {
                return Err(ConfigValidationError::ExogenousTarget {
                    edge: format!("*->{node}"),
                });
            }
            config.require_baseline(node)?;
        }
        Ok(())
    }
}
