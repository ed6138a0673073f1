//! Retry/backoff layer
//!
//! Rate-limited calls are retried forever with exponential backoff
//! (2 s doubling to a 30 s ceiling). Every other error, including an
//! exhausted daily quota, is returned on the first occurrence.

pub mod sleeper;

pub use sleeper::{Sleeper, TokioSleeper};

use crate::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// First backoff delay
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Largest backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Exponential delay sequence, capped
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    ceiling: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(INITIAL_BACKOFF, MAX_BACKOFF)
    }
}

impl Backoff {
    pub fn new(initial: Duration, ceiling: Duration) -> Self {
        Self {
            next: initial.min(ceiling),
            ceiling,
        }
    }

    /// Delay to wait now; doubles the following one.
    pub fn next_delay(&mut self) -> Duration {
        let current = self.next;
        self.next = current.saturating_mul(2).min(self.ceiling);
        current
    }
}

/// Run `op` until it stops failing with a rate-limit error.
///
/// Each call to this function starts from a fresh [`Backoff`].
pub async fn retry_rate_limited<T, F, Fut>(label: &str, sleeper: &dyn Sleeper, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = Backoff::default();
    loop {
        match op().await {
            Err(err) if err.is_rate_limited() => {
                let delay = backoff.next_delay();
                warn!("{} rate limited, retrying in {:?}", label, delay);
                sleeper.sleep(delay).await?;
            }
            other => return other,
        }
    }
}
