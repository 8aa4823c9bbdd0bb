//! Error handling for lagchain.
//! One error enum per subsystem, `thiserror` only.

pub mod align_error;
pub mod config_error;
pub mod config_validation_error;
pub mod error_code;
pub mod event_error;
pub mod lagchain_error;
pub mod schema_error;
pub mod simulation_error;
pub mod stability_error;

pub use align_error::AlignError;
pub use config_error::ConfigError;
pub use config_validation_error::ConfigValidationError;
pub use error_code::LagchainErrorCode;
pub use event_error::EventError;
pub use lagchain_error::{LagchainError, LagchainResult};
pub use schema_error::SchemaError;
pub use simulation_error::SimulationError;
pub use stability_error::StabilityError;
