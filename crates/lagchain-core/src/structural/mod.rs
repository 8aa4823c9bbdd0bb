//! Structural model: node ordering, per-edge coefficients, ablations.

pub mod ablation;
pub mod agreement;
pub mod config;
pub mod edge;
pub mod effects;

pub use ablation::AblationSpec;
pub use agreement::{kappa_agreement, EdgeAgreement, KappaAgreement};
pub use config::{StructuralConfig, StructuralConfigBuilder};
pub use edge::Edge;
