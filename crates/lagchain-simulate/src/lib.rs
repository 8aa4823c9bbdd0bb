//! # lagchain-simulate
//!
//! Forward propagation of the structural chain.
//!
//! - `simulator`: the lag-1 recursion with edge ablation
//! - `catalogue`: the standard set of named scenarios
//! - `runner`: every scenario over every unit, tagged by `run_tag`
//! - `anchors`: eligibility screening of anchor times
//! - `window`: anchor-window counterfactuals averaged across anchors

pub mod anchors;
pub mod catalogue;
pub mod runner;
pub mod simulator;
pub mod window;

pub use anchors::{AnchorEligibility, AnchorExclusion, ExclusionReason};
pub use catalogue::standard_catalogue;
pub use runner::AblationRunner;
pub use simulator::{ChainSimulator, Trajectory};
pub use window::{simulate_anchor_window, AnchorWindow, AnchorWindowRunner, WindowMeanRow};
