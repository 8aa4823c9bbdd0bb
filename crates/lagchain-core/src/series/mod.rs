//! Per-unit time series and the panel that groups them.

pub mod panel;
pub mod unit_series;

pub use panel::{ObservationRecord, Panel};
pub use unit_series::{UnitId, UnitSeries};
