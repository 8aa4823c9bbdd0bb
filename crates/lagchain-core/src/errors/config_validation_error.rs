use super::error_code::{self, LagchainErrorCode};

/// Structural config / scenario validation errors. Fail-fast: a malformed
/// scenario never simulates with an implicit zero.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("missing config key: {key}")]
    MissingKey { key: String },

    #[error("unknown node '{node}'")]
    UnknownNode { node: String },

    #[error("duplicate node '{node}' in ordering")]
    DuplicateNode { node: String },

    #[error("node ordering needs at least {min} nodes, got {actual}")]
    TooFewNodes { min: usize, actual: usize },

    #[error("edge {edge} runs against the declared node order")]
    OrderViolation { edge: String },

    #[error("edge {edge} targets the exogenous node")]
    ExogenousTarget { edge: String },

    #[error("cycle detected in structural graph: {path}")]
    CycleDetected { path: String },

    #[error("non-finite value for {key}")]
    NonFinite { key: String },
}

impl LagchainErrorCode for ConfigValidationError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_VALIDATION
    }
}
