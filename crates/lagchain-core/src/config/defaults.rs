// Single source of truth for all default values.

// --- Alignment ---
pub const DEFAULT_LAG_MIN: i64 = -12;
pub const DEFAULT_LAG_MAX: i64 = 24;
pub const DEFAULT_BOOT_N: usize = 500;
pub const DEFAULT_ALIGN_SEED: u64 = 13;
pub const DEFAULT_REFERENCE_LAG: i64 = -1;
pub const DEFAULT_TRIGGER_FLAG: &str = "A_low";

// --- Null model ---
pub const DEFAULT_BLOCK_SIZE: usize = 12;
pub const DEFAULT_N_SHUFFLES: usize = 1;
pub const DEFAULT_NULL_SEED: u64 = 7;

// --- Stability ---
pub const DEFAULT_STABILITY_WINDOW: usize = 36;
pub const DEFAULT_STABILITY_STEP: usize = 6;
pub const DEFAULT_RIDGE: f64 = 1e-6;

// --- Anchors ---
pub const DEFAULT_ANCHOR_LAG_PRE: i64 = 6;
pub const DEFAULT_ANCHOR_LAG_POST: i64 = 24;
pub const DEFAULT_THRESHOLD_QUANTILE: f64 = 0.10;

// --- Simulation ---
pub const DEFAULT_PARALLEL: bool = true;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
