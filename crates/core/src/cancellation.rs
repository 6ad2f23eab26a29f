//! Cooperative cancellation signal for the async bridges

use crate::errors::{Error, Failure};
use crate::fail_fast::raise;
use crate::result::VoidResult;
use crate::void::Void;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// A cancellation flag shared between a caller and the work it started.
///
/// Clones observe the same flag. Cancelling is one-way.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation and wake every waiter
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            tracing::debug!("cancellation requested");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Wait until the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// `Err` with a cancelled error once the token is cancelled
    pub fn check(&self) -> VoidResult {
        if self.is_cancelled() {
            Err(Error::cancelled())
        } else {
            Ok(Void)
        }
    }

    /// Raise a cancelled failure once the token is cancelled
    #[track_caller]
    pub fn raise_if_cancelled(&self) {
        if self.is_cancelled() {
            raise(Failure::cancelled());
        }
    }
}
