use super::error_code::{self, LagchainErrorCode};

/// Lag alignment and null-model parameter errors.
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    #[error("invalid lag window: lag_min {lag_min} > lag_max {lag_max}")]
    InvalidLagWindow { lag_min: i64, lag_max: i64 },

    #[error("block size must be at least 1")]
    InvalidBlockSize,

    #[error("curves do not share lag {lag}")]
    LagMismatch { lag: i64 },

    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl LagchainErrorCode for AlignError {
    fn error_code(&self) -> &'static str {
        error_code::ALIGN_ERROR
    }
}
