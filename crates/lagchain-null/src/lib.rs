//! # lagchain-null
//!
//! Temporal-order-destroying null models.
//!
//! - `shuffle`: block-wise repositioning of set flags, block-wise value permutation
//! - `generator`: the `NullModelGenerator` and its replicate seeding
//! - `event_null`: ordered vs shuffled onset-locked response means
//! - `correlation_null`: ordered vs shuffled lagged correlations

pub mod correlation_null;
pub mod event_null;
pub mod generator;
pub mod shuffle;

pub use correlation_null::corr_at_lag;
pub use event_null::NullCurveRow;
pub use generator::NullModelGenerator;
pub use shuffle::{block_ranges, block_shuffle, permute_within_blocks};
