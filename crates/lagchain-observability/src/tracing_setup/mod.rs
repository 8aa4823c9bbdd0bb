//! Subscriber setup and the span / event vocabulary of a run.

pub mod events;
pub mod spans;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lagchain_core::config::ObservabilityConfig;
use lagchain_core::errors::ConfigError;

/// Environment variable that overrides the configured log level.
pub const LOG_ENV_VAR: &str = "LAGCHAIN_LOG";

/// Filter from `LAGCHAIN_LOG` when set and valid, else from `log_level`.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| ConfigError::ValidationFailed {
        field: "observability.log_level".to_string(),
        message: e.to_string(),
    })
}

/// Install the global subscriber. A second call keeps the first
/// subscriber and succeeds.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ConfigError> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}
