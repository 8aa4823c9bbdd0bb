use super::error_code::{self, LagchainErrorCode};

/// Chain simulation errors.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("missing state for unit {unit}: {what} at t={t}")]
    MissingState { unit: String, t: i64, what: String },

    #[error("unit {unit} has no time steps to simulate")]
    EmptyUnit { unit: String },
}

impl LagchainErrorCode for SimulationError {
    fn error_code(&self) -> &'static str {
        error_code::MISSING_STATE
    }
}
