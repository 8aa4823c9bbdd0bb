//! Anchor flags for continuous drivers: a step is flagged when its first
//! difference falls at or below a low quantile of all differences.

use lagchain_core::errors::SchemaError;
use lagchain_core::series::Panel;
use lagchain_core::stats::{diff, nan_quantile};

/// 0/1 flags, same length as `values`. The first step is always 0; steps
/// with a non-finite difference are 0.
pub fn threshold_anchor_flags(values: &[f64], q: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let deltas = diff(values);
    let threshold = nan_quantile(&deltas, q);
    let mut flags = Vec::with_capacity(values.len());
    flags.push(0.0);
    flags.extend(
        deltas
            .iter()
            .map(|d| if d.is_finite() && *d <= threshold { 1.0 } else { 0.0 }),
    );
    flags
}

/// Add `flag` to every unit, computed from `column` per unit.
pub fn with_threshold_flag(panel: &Panel, column: &str, flag: &str, q: f64) -> Result<Panel, SchemaError> {
    panel.require_columns(&[column])?;
    panel.try_map_units(|series| {
        let values = series.column(column).unwrap_or(&[]);
        let flags = threshold_anchor_flags(values, q);
        tracing::debug!(unit = %series.unit(), anchors = flags.iter().filter(|f| **f > 0.0).count(), "threshold anchors");
        series.with_column(flag, flags)
    })
}
