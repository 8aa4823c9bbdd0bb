//! Cooperative early-abort for long bootstrap and shuffle loops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{LagchainError, LagchainResult};

/// Something that can be asked to stop.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    fn cancel(&self);

    /// `Err(Cancelled)` once cancellation has been requested.
    fn check(&self) -> LagchainResult<()> {
        if self.is_cancelled() {
            Err(LagchainError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Shared flag; clones observe the same state. Batch callers pass
/// `CancellationToken::default()` and never cancel.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
