//! Cooperative cancellation for long runs.
//!
//! The engine checks the token between files during model construction and
//! between entry points during evaluation. There are no timeouts: an
//! analysis either completes or is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{GuardrailError, GuardrailResult};

/// A cloneable flag polled at loop boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Err(Cancelled)` if cancellation was requested.
    pub fn check(&self) -> GuardrailResult<()> {
        if self.is_cancelled() {
            Err(GuardrailError::Cancelled)
        } else {
            Ok(())
        }
    }
}
