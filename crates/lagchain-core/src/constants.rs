/// lagchain version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Node ordering used when a structural config does not declare one.
pub const DEFAULT_NODES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Run tag of the unablated scenario.
pub const FULL_RUN_TAG: &str = "Full_main";

/// Run tag of the scenario that removes every edge.
pub const REMOVE_ALL_RUN_TAG: &str = "None";

/// Lower / upper percentile of the bootstrap confidence band.
pub const BOOTSTRAP_LO_QUANTILE: f64 = 0.025;
pub const BOOTSTRAP_HI_QUANTILE: f64 = 0.975;

/// A counterfactual delta above this is treated as a genuine departure.
pub const DELTA_ONSET_EPSILON: f64 = 1e-9;

/// Minimum overlap for a lagged correlation to be reported.
pub const MIN_CORRELATION_SAMPLES: usize = 3;

/// Standard deviations below this are treated as zero.
pub const VARIANCE_EPSILON: f64 = 1e-12;

/// Number of bootstrap resamples between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 64;
