//! Span definitions per operation: pipeline, simulation, alignment,
//! shuffle and stability.

/// Create a pipeline span.
#[macro_export]
macro_rules! pipeline_span {
    ($trigger_flag:expr) => {
        tracing::info_span!("lagchain.pipeline", trigger_flag = %$trigger_flag)
    };
}

/// Create a simulation span over a scenario catalogue.
#[macro_export]
macro_rules! simulate_span {
    ($scenarios:expr) => {
        tracing::info_span!("lagchain.simulate", scenarios = $scenarios)
    };
}

/// Create an alignment span.
#[macro_export]
macro_rules! align_span {
    ($column:expr, $mode:expr) => {
        tracing::info_span!("lagchain.align", column = %$column, mode = ?$mode)
    };
}

/// Create a shuffle span.
#[macro_export]
macro_rules! shuffle_span {
    ($flag:expr, $replicates:expr) => {
        tracing::info_span!("lagchain.shuffle", flag = %$flag, replicates = $replicates)
    };
}

/// Create a stability span.
#[macro_export]
macro_rules! stability_span {
    ($unit:expr, $window:expr) => {
        tracing::info_span!("lagchain.stability", unit = %$unit, window = $window)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const PIPELINE: &str = "lagchain.pipeline";
    pub const SIMULATE: &str = "lagchain.simulate";
    pub const ALIGN: &str = "lagchain.align";
    pub const SHUFFLE: &str = "lagchain.shuffle";
    pub const STABILITY: &str = "lagchain.stability";
}
