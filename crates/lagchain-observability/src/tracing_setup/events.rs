//! Structured events emitted by the orchestration layer.

/// A lag curve was produced.
pub fn curve_aligned(run_tag: &str, column: &str, lags: usize, degraded_lags: usize) {
    tracing::info!(run_tag, column, lags, degraded_lags, "curve aligned");
}

/// A soft-degraded result was recorded.
pub fn degradation_recorded(component: &str, kind: &str, count: usize) {
    tracing::warn!(component, kind, count, "degraded results");
}

/// The run completed; `tables` results were fingerprinted.
pub fn run_finished(tables: usize, fingerprint: &str) {
    tracing::info!(tables, fingerprint, "analysis run finished");
}
