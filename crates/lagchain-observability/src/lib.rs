//! # lagchain-observability
//!
//! Structured tracing for analysis runs.
//!
//! - `tracing_setup`: subscriber initialisation, span macros, event helpers
//! - `degradation`: per-run record of soft-degraded results

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationKind, DegradationRecord, DegradationTracker};
pub use tracing_setup::{build_filter, init_tracing, LOG_ENV_VAR};
