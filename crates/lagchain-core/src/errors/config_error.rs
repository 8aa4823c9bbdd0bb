use super::error_code::{self, LagchainErrorCode};
use super::ConfigValidationError;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error in {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("structural config invalid: {0}")]
    Structural(#[from] ConfigValidationError),
}

impl LagchainErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Structural(e) => e.error_code(),
            _ => error_code::CONFIG_ERROR,
        }
    }
}
