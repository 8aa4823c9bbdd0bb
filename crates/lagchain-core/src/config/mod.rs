//! Configuration system for lagchain.
//! TOML-based; every run receives an explicit `AnalysisConfig`.

pub mod alignment_config;
pub mod analysis_config;
pub mod anchor_config;
pub mod defaults;
pub mod null_model_config;
pub mod observability_config;
pub mod simulation_config;
pub mod stability_config;

pub use alignment_config::{AlignmentConfig, EdgePair};
pub use analysis_config::AnalysisConfig;
pub use anchor_config::AnchorConfig;
pub use null_model_config::{BlockScheme, NullModelConfig};
pub use observability_config::ObservabilityConfig;
pub use simulation_config::{InitialStatePolicy, SimulationConfig};
pub use stability_config::StabilityConfig;
