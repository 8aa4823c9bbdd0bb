//! # lagchain-core
//!
//! Foundation crate for the lagchain causal-chain engine.
//! Defines the data model (structural config, panels, lag curves), errors,
//! config, cancellation and the driver trait. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod series;
pub mod stats;
pub mod structural;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AnalysisConfig;
pub use errors::{LagchainError, LagchainResult};
pub use models::{LagCurve, LagPoint, Onset, OnsetSet, OperatorSnapshot, ResultTable, SimulatedRow};
pub use series::{ObservationRecord, Panel, UnitId, UnitSeries};
pub use structural::{AblationSpec, Edge, StructuralConfig};
pub use traits::{Cancellable, CancellationToken, ConstantDriver, DriverSource, ObservedDriver};
