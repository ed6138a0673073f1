//! Cancellable sleeping
//!
//! Backoff waits and pacing pauses go through [`Sleeper`] so tests can record
//! the requested delays instead of waiting them out.

use crate::{Error, Result, utils::Cancellation};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`. Fails with [`Error::Cancelled`] if the run stops first.
    async fn sleep(&self, duration: Duration) -> Result<()>;
}

/// Real sleeper backed by the tokio timer
#[derive(Debug, Clone, Default)]
pub struct TokioSleeper {
    cancel: Cancellation,
}

impl TokioSleeper {
    pub fn new(cancel: Cancellation) -> Self {
        Self { cancel }
    }
}

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
