//! # lagchain-stability
//!
//! Checks that the one-step propagation operator of the chain stays
//! non-explosive over time.
//!
//! - `ridge`: ridge-regularised least squares
//! - `spectral`: spectral radius and triangularity helpers
//! - `rolling`: the rolling-window `StabilityAnalyzer`
//! - `structural`: the operator implied by a configured coefficient set

pub mod ridge;
pub mod rolling;
pub mod spectral;
pub mod structural;

pub use ridge::ridge_solve;
pub use rolling::StabilityAnalyzer;
pub use spectral::{is_lower_triangular, spectral_radius, zero_upper_and_diagonal};
pub use structural::{structural_operator, StructuralOperator};
