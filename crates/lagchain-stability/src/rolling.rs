use nalgebra::{DMatrix, DVector};

use lagchain_core::config::StabilityConfig;
use lagchain_core::errors::{LagchainResult, SchemaError, StabilityError};
use lagchain_core::models::{OperatorSnapshot, ResultTable};
use lagchain_core::series::UnitSeries;

use crate::ridge::ridge_solve;
use crate::spectral::{spectral_radius, zero_upper_and_diagonal};

/// Fits a lower-triangular lag-1 operator on rolling windows of the node
/// vector. Column order of the node matrix is the causal order; column 0
/// is exogenous and never regressed.
#[derive(Debug, Clone)]
pub struct StabilityAnalyzer {
    window: usize,
    step: usize,
    ridge: f64,
}

impl StabilityAnalyzer {
    pub fn new(window: usize, step: usize, ridge: f64) -> Result<Self, StabilityError> {
        if window < 2 {
            return Err(StabilityError::WindowTooSmall { window });
        }
        if step == 0 {
            return Err(StabilityError::InvalidStep);
        }
        if !ridge.is_finite() || ridge < 0.0 {
            return Err(StabilityError::InvalidRidge { ridge });
        }
        Ok(Self { window, step, ridge })
    }

    pub fn from_config(config: &StabilityConfig) -> Result<Self, StabilityError> {
        Self::new(config.window, config.step, config.ridge)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// One snapshot per window start `0, step, 2·step, ..` that fits a full
    /// window. Fewer rows than `window` yields no snapshots.
    pub fn rolling_spectral_radius(
        &self,
        times: &[i64],
        matrix: &[Vec<f64>],
    ) -> Result<Vec<OperatorSnapshot>, StabilityError> {
        if times.len() != matrix.len() {
            return Err(StabilityError::TimeMismatch {
                times: times.len(),
                rows: matrix.len(),
            });
        }
        let p = matrix.first().map_or(0, Vec::len);
        if let Some((row, values)) = matrix.iter().enumerate().find(|(_, v)| v.len() != p) {
            return Err(StabilityError::RaggedMatrix {
                row,
                expected: p,
                actual: values.len(),
            });
        }
        if matrix.len() < self.window {
            return Ok(Vec::new());
        }

        let snapshots: Vec<OperatorSnapshot> = (0..=matrix.len() - self.window)
            .step_by(self.step)
            .map(|start| {
                let end = start + self.window;
                self.fit_window(&times[start..end], &matrix[start..end], p)
            })
            .collect();

        let degraded = snapshots.iter().filter(|s| s.degraded_rows > 0).count();
        if degraded > 0 {
            tracing::warn!(windows = snapshots.len(), degraded, "stability windows degraded");
        }
        Ok(snapshots)
    }

    fn fit_window(&self, times: &[i64], rows: &[Vec<f64>], p: usize) -> OperatorSnapshot {
        let mut k = DMatrix::<f64>::zeros(p, p);
        let (mut fitted_rows, mut degraded_rows) = (0, 0);
        for i in 1..p {
            match fit_row(rows, i, self.ridge) {
                Some(beta) => {
                    for (j, b) in beta.iter().enumerate() {
                        k[(i, j)] = *b;
                    }
                    fitted_rows += 1;
                }
                None => degraded_rows += 1,
            }
        }
        zero_upper_and_diagonal(&mut k);

        let mean_t = times.iter().map(|t| *t as f64).sum::<f64>() / times.len() as f64;
        OperatorSnapshot {
            t_mid: mean_t.round_ties_even() as i64,
            rho: spectral_radius(&k),
            fitted_rows,
            degraded_rows,
            operator: k.row_iter().map(|r| r.iter().copied().collect()).collect(),
        }
    }

    /// Rolling snapshots of one unit over `nodes`, in the given order.
    pub fn analyze_unit(&self, series: &UnitSeries, nodes: &[String]) -> LagchainResult<ResultTable<OperatorSnapshot>> {
        let required: Vec<&str> = nodes.iter().map(String::as_str).collect();
        SchemaError::check_columns(&format!("unit {}", series.unit()), &required, |c| series.has_column(c))?;
        let columns: Vec<&[f64]> = nodes
            .iter()
            .map(|n| series.column(n).unwrap_or_default())
            .collect();
        let matrix: Vec<Vec<f64>> = (0..series.len())
            .map(|pos| columns.iter().map(|c| c[pos]).collect())
            .collect();
        let snapshots = self.rolling_spectral_radius(series.times(), &matrix)?;
        tracing::debug!(unit = %series.unit(), windows = snapshots.len(), "stability analysed");
        Ok(ResultTable::new(format!("stability_{}", series.unit()), snapshots))
    }
}

/// Ridge regression of node `i` at `t+1` on nodes `0..i` at `t`. `None`
/// (a zero row) when the window has fewer than `i + 1` transitions, holds
/// a non-finite value, or the solve fails.
fn fit_row(rows: &[Vec<f64>], i: usize, ridge: f64) -> Option<DVector<f64>> {
    let samples = rows.len().saturating_sub(1);
    if samples < i + 1 {
        return None;
    }
    let x = DMatrix::from_fn(samples, i, |r, c| rows[r][c]);
    let y = DVector::from_fn(samples, |r, _| rows[r + 1][i]);
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }
    ridge_solve(&x, &y, ridge)
}
