//! Cancellation for in-flight executions: shared abort tokens.
//!
//! The retry loop checks the token before each attempt and while waiting out
//! an inter-retry delay; a triggered token surfaces as `RetryError::Aborted`
//! rather than as one of the operation's own failures.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared token a caller can trigger to abort a running execution.
///
/// Clones share the same underlying flag; hand one clone to the executing
/// thread and keep another to signal from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; wakes any in-progress delay.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Granularity of the token poll while waiting out a delay.
const POLL_SLICE: Duration = Duration::from_millis(20);

/// Sleeps for `total`, polling the token between slices. Returns false if
/// cancellation was requested before the full duration elapsed.
pub(crate) fn sleep_cancellable(total: Duration, token: &CancelToken) -> bool {
    let mut remaining = total;
    while !remaining.is_zero() {
        if token.is_cancelled() {
            return false;
        }
        let slice = remaining.min(POLL_SLICE);
        std::thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
    !token.is_cancelled()
}
