use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigValidationError;

/// A directed influence `parent -> child` with a one-step lag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

impl Edge {
    pub fn new(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Config key holding this edge's coefficient, e.g. `effects.B.kappa_A`.
    pub fn coefficient_key(&self) -> String {
        format!("effects.{}.kappa_{}", self.child, self.parent)
    }

    /// Scenario tag for removing this edge, e.g. `NoAtoB`.
    pub fn removal_tag(&self) -> String {
        format!("No{}to{}", self.parent, self.child)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.parent, self.child)
    }
}

impl FromStr for Edge {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parent, child) = s
            .split_once("->")
            .ok_or_else(|| ConfigValidationError::MissingKey { key: s.to_string() })?;
        let (parent, child) = (parent.trim(), child.trim());
        if parent.is_empty() || child.is_empty() {
            return Err(ConfigValidationError::MissingKey { key: s.to_string() });
        }
        Ok(Self::new(parent, child))
    }
}
