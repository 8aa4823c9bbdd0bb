//! Loading a `StructuralConfig` from an "effects" TOML document:
//!
//! ```toml
//! nodes = ["A", "B", "C", "D", "E"]   # optional, this is the default
//!
//! [effects.B]
//! baseline = 0.0
//! kappa_A = 0.6
//! ```
//!
//! Keys other than `baseline` and `kappa_<parent>` are ignored.

use std::collections::BTreeMap;

use toml::Value;

use super::config::StructuralConfig;
use super::edge::Edge;
use crate::constants::DEFAULT_NODES;
use crate::errors::{ConfigError, ConfigValidationError};

const SOURCE: &str = "effects";

impl StructuralConfig {
    /// Parse and validate an effects document.
    pub fn from_effects_toml(content: &str) -> Result<Self, ConfigError> {
        let doc: Value = content.parse::<toml::Table>().map(Value::Table).map_err(|e| {
            ConfigError::ParseError {
                source_name: SOURCE.to_string(),
                message: e.to_string(),
            }
        })?;

        let nodes = match doc.get("nodes") {
            None => DEFAULT_NODES.iter().map(|n| n.to_string()).collect(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| ConfigError::ParseError {
                        source_name: SOURCE.to_string(),
                        message: "`nodes` must be an array of strings".to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ConfigError::ParseError {
                    source_name: SOURCE.to_string(),
                    message: "`nodes` must be an array of strings".to_string(),
                })
            }
        };

        let mut baselines = BTreeMap::new();
        let mut coefficients = BTreeMap::new();

        if let Some(effects) = doc.get("effects") {
            let effects = effects.as_table().ok_or_else(|| ConfigError::ParseError {
                source_name: SOURCE.to_string(),
                message: "`effects` must be a table".to_string(),
            })?;
            for (node, entry) in effects {
                if !nodes.iter().any(|n| n == node) {
                    return Err(ConfigValidationError::UnknownNode { node: node.clone() }.into());
                }
                let Some(entry) = entry.as_table() else {
                    continue;
                };
                for (key, value) in entry {
                    if key == "baseline" {
                        baselines.insert(node.clone(), number(value, &format!("effects.{node}.baseline"))?);
                    } else if let Some(parent) = key.strip_prefix("kappa_") {
                        if !nodes.iter().any(|n| n == parent) {
                            return Err(ConfigValidationError::UnknownNode {
                                node: parent.to_string(),
                            }
                            .into());
                        }
                        let edge = Edge::new(parent, node.as_str());
                        let kappa = number(value, &edge.coefficient_key())?;
                        coefficients.insert(edge, kappa);
                    }
                }
            }
        }

        Ok(StructuralConfig::new(nodes, baselines, coefficients)?)
    }

    /// Render back into the effects format.
    pub fn to_effects_toml(&self) -> String {
        let mut out = format!(
            "nodes = [{}]\n",
            self.nodes()
                .iter()
                .map(|n| format!("\"{n}\""))
                .collect::<Vec<_>>()
                .join(", ")
        );
        for node in self.downstream() {
            out.push_str(&format!("\n[effects.{node}]\n"));
            if let Some(b) = self.baseline(node) {
                out.push_str(&format!("baseline = {b:?}\n"));
            }
            for edge in self.inbound(node) {
                if let Some(k) = self.coefficient(edge) {
                    out.push_str(&format!("kappa_{} = {k:?}\n", edge.parent));
                }
            }
        }
        out
    }
}

fn number(value: &Value, key: &str) -> Result<f64, ConfigError> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        _ => Err(ConfigError::ValidationFailed {
            field: key.to_string(),
            message: "expected a number".to_string(),
        }),
    }
}
