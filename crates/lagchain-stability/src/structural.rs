use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use lagchain_core::errors::ConfigValidationError;
use lagchain_core::structural::{AblationSpec, StructuralConfig};

use crate::spectral::spectral_radius;

/// Lag-1 operator implied by a coefficient set: `operator[child][parent] = κ`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralOperator {
    pub run_tag: String,
    pub nodes: Vec<String>,
    pub operator: Vec<Vec<f64>>,
    pub rho: f64,
}

/// Builds the operator of `config` with the edges of `ablation` removed.
/// Edge direction follows the node order, so the result is strictly
/// lower-triangular.
pub fn structural_operator(
    config: &StructuralConfig,
    ablation: &AblationSpec,
) -> Result<StructuralOperator, ConfigValidationError> {
    ablation.validate_against(config)?;
    let p = config.nodes().len();
    let mut k = DMatrix::<f64>::zeros(p, p);
    for (edge, kappa) in config.edges() {
        if ablation.is_ablated(edge) {
            continue;
        }
        let unknown = |node: &str| ConfigValidationError::UnknownNode { node: node.to_string() };
        let child = config.node_index(&edge.child).ok_or_else(|| unknown(&edge.child))?;
        let parent = config.node_index(&edge.parent).ok_or_else(|| unknown(&edge.parent))?;
        k[(child, parent)] = kappa;
    }
    Ok(StructuralOperator {
        run_tag: ablation.name.clone(),
        nodes: config.nodes().to_vec(),
        rho: spectral_radius(&k),
        operator: k.row_iter().map(|r| r.iter().copied().collect()).collect(),
    })
}
