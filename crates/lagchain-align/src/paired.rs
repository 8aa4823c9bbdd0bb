//! Observed vs counterfactual curves, rebased at a reference lag.

use serde::{Deserialize, Serialize};

use lagchain_core::constants::DELTA_ONSET_EPSILON;
use lagchain_core::errors::AlignError;
use lagchain_core::models::LagCurve;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedRow {
    pub lag: i64,
    pub observed: f64,
    /// Counterfactual mean after the rebase offset.
    pub counterfactual: f64,
    pub delta: f64,
    pub n_observed: usize,
    pub n_counterfactual: usize,
}

/// Pair two curves on the same lag grid. The counterfactual is shifted by
/// `observed - counterfactual` at `reference_lag` so both agree there; the
/// shift is 0 when the reference lag is absent or either value there is
/// non-finite. `delta = observed - counterfactual` after the shift.
pub fn pair_with_rebase_offset(
    observed: &LagCurve,
    counterfactual: &LagCurve,
    reference_lag: i64,
) -> Result<Vec<PairedRow>, AlignError> {
    if observed.len() != counterfactual.len() {
        return Err(AlignError::LengthMismatch {
            left: observed.len(),
            right: counterfactual.len(),
        });
    }
    for (o, c) in observed.iter().zip(counterfactual.iter()) {
        if o.lag != c.lag {
            return Err(AlignError::LagMismatch { lag: o.lag.min(c.lag) });
        }
    }

    let offset = match (observed.get(reference_lag), counterfactual.get(reference_lag)) {
        (Some(o), Some(c)) if o.mean.is_finite() && c.mean.is_finite() => o.mean - c.mean,
        _ => 0.0,
    };

    Ok(observed
        .iter()
        .zip(counterfactual.iter())
        .map(|(o, c)| {
            let cf = c.mean + offset;
            PairedRow {
                lag: o.lag,
                observed: o.mean,
                counterfactual: cf,
                delta: o.mean - cf,
                n_observed: o.n,
                n_counterfactual: c.n,
            }
        })
        .collect())
}

/// Summary of one scenario's paired delta curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualMetrics {
    pub run_tag: String,
    /// Sum of finite deltas.
    pub delta_auc: f64,
    /// Largest finite delta; NaN when none is finite.
    pub delta_max: f64,
    /// First lag whose delta exceeds `DELTA_ONSET_EPSILON`.
    pub lag_onset: Option<i64>,
}

impl CounterfactualMetrics {
    pub fn from_pairs(run_tag: impl Into<String>, rows: &[PairedRow]) -> Self {
        let finite = || rows.iter().map(|r| r.delta).filter(|d| d.is_finite());
        let delta_max = finite().fold(f64::NAN, f64::max);
        Self {
            run_tag: run_tag.into(),
            delta_auc: finite().sum(),
            delta_max,
            lag_onset: rows
                .iter()
                .find(|r| r.delta.is_finite() && r.delta > DELTA_ONSET_EPSILON)
                .map(|r| r.lag),
        }
    }
}
