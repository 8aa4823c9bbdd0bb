//! Seams shared by the engines.

pub mod cancellation;
pub mod driver;

pub use cancellation::{Cancellable, CancellationToken};
pub use driver::{ConstantDriver, DriverSource, ObservedDriver};
