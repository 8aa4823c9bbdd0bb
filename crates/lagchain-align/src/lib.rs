//! # lagchain-align
//!
//! Averages a response series around trigger times over a fixed lag window.
//!
//! - `aligner`: mean and cumulative-rebased alignment
//! - `bootstrap`: per-lag percentile bands with lag-seeded streams
//! - `cumulative`: running sums of a curve
//! - `paired`: observed vs counterfactual curves and their metrics

pub mod aligner;
pub mod bootstrap;
pub mod cumulative;
pub mod paired;

pub use aligner::{AlignMode, LagAligner};
pub use bootstrap::{bootstrap_band, lag_seed};
pub use cumulative::to_cumulative;
pub use paired::{pair_with_rebase_offset, CounterfactualMetrics, PairedRow};
