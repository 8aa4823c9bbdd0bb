use super::error_code::{self, LagchainErrorCode};
use super::{
    AlignError, ConfigError, ConfigValidationError, EventError, SchemaError, SimulationError,
    StabilityError,
};

/// Top-level error aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum LagchainError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("config validation error: {0}")]
    ConfigValidation(#[from] ConfigValidationError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("event error: {0}")]
    Event(#[from] EventError),

    #[error("alignment error: {0}")]
    Align(#[from] AlignError),

    #[error("stability error: {0}")]
    Stability(#[from] StabilityError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience alias used across the workspace.
pub type LagchainResult<T> = Result<T, LagchainError>;

impl LagchainErrorCode for LagchainError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Schema(e) => e.error_code(),
            Self::Simulation(e) => e.error_code(),
            Self::ConfigValidation(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Event(e) => e.error_code(),
            Self::Align(e) => e.error_code(),
            Self::Stability(e) => e.error_code(),
            Self::Serialization(_) => error_code::SCHEMA_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
