//! Run-wide cancellation signal
//!
//! A cloneable flag shared by the whole run. CPU-bound code polls
//! [`Cancellation::is_cancelled`]; async code awaits [`Cancellation::cancelled`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    stop: AtomicBool,
    notify: Notify,
}

/// Cancellation signal shared between the driver and every suspension point
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    inner: Arc<Inner>,
}

impl Cancellation {
    /// Create a signal that has not fired yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether the signal has fired
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.stop.load(Ordering::Relaxed)
    }

    /// Resolve once the signal fires
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel() is not missed.
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
