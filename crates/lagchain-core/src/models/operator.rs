use serde::{Deserialize, Serialize};

/// Lag-1 operator fitted on one rolling window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSnapshot {
    /// Rounded mean of the window's time index.
    pub t_mid: i64,
    /// Largest absolute eigenvalue of `operator`.
    pub rho: f64,
    /// Rows solved by the ridge regression.
    pub fitted_rows: usize,
    /// Rows left at zero (too few samples, non-finite data, failed solve).
    pub degraded_rows: usize,
    /// Row-major square matrix; strictly lower-triangular.
    pub operator: Vec<Vec<f64>>,
}
