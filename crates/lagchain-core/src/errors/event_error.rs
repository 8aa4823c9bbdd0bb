use super::error_code::{self, LagchainErrorCode};

/// Event extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("no onsets of '{flag}' found across {units} units")]
    NoEvents { flag: String, units: usize },

    #[error("no eligible anchors after coverage screening ({excluded} excluded)")]
    NoEligibleAnchors { excluded: usize },
}

impl LagchainErrorCode for EventError {
    fn error_code(&self) -> &'static str {
        error_code::NO_EVENTS
    }
}
