//! # lagchain-pipeline
//!
//! Runs one complete analysis over a panel and bundles every result table.

pub mod pipeline;
pub mod report;

pub use pipeline::AnalysisPipeline;
pub use report::{AnalysisReport, CurveRow, PairedCurveRow, ScenarioMetrics};
