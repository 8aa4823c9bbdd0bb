use super::error_code::{self, LagchainErrorCode};

/// Rolling operator-stability errors. Per-window degradation is not an
/// error; these cover malformed requests only.
#[derive(Debug, thiserror::Error)]
pub enum StabilityError {
    #[error("window must span at least 2 steps, got {window}")]
    WindowTooSmall { window: usize },

    #[error("step must be at least 1")]
    InvalidStep,

    #[error("ridge penalty must be finite and non-negative, got {ridge}")]
    InvalidRidge { ridge: f64 },

    #[error("{times} time indices for {rows} node rows")]
    TimeMismatch { times: usize, rows: usize },

    #[error("node matrix row {row} has {actual} values, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl LagchainErrorCode for StabilityError {
    fn error_code(&self) -> &'static str {
        error_code::STABILITY_ERROR
    }
}
