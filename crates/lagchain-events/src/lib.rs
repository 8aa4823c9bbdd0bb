//! # lagchain-events
//!
//! Turns per-unit 0/1 flag columns into discrete trigger times.
//!
//! - `onsets`: rising-edge detection and the `EventExtractor`
//! - `threshold`: flags from large negative first differences

pub mod onsets;
pub mod threshold;

pub use onsets::{is_set, onset_table, require_events, rising_edges, EventExtractor};
pub use threshold::{threshold_anchor_flags, with_threshold_flag};
