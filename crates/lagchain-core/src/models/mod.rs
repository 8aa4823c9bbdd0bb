//! Result records shared across the workspace.

pub mod lag_curve;
pub mod onset;
pub mod operator;
pub mod simulated;
pub mod table;

pub use lag_curve::{LagCurve, LagPoint};
pub use onset::{Onset, OnsetSet};
pub use operator::OperatorSnapshot;
pub use simulated::SimulatedRow;
pub use table::ResultTable;
