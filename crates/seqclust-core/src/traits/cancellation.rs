//! Per-run cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::ClusteringError;

/// Anything a clustering run can poll for a stop request.
pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Request a stop. Takes effect before the next merge.
    fn cancel(&self);
}

/// Stop flag for one clustering run.
///
/// Clones share the flag, so a handle taken from a run can be moved to
/// another thread and cancelled there. A run only ever observes the flag
/// between merges; the merge in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear a previous cancel so the handle can drive another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// `Err(Cancelled)` once a stop has been requested.
    pub fn check(&self, merges_completed: usize) -> Result<(), ClusteringError> {
        if self.is_cancelled() {
            return Err(ClusteringError::Cancelled { merges_completed });
        }
        Ok(())
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
