//! Stable error codes for downstream consumers.

/// Every error enum maps to a structured code string so that reporting
/// collaborators can branch on the failure class without parsing messages.
pub trait LagchainErrorCode {
    /// Returns the error code string (e.g., "SCHEMA_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
pub const MISSING_STATE: &str = "MISSING_STATE";
pub const CONFIG_VALIDATION: &str = "CONFIG_VALIDATION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const NO_EVENTS: &str = "NO_EVENTS";
pub const ALIGN_ERROR: &str = "ALIGN_ERROR";
pub const STABILITY_ERROR: &str = "STABILITY_ERROR";
pub const CANCELLED: &str = "CANCELLED";
