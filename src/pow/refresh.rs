//! PoW freshness policy
//!
//! The credential is refreshed when the service reports none, or when the
//! current one expires within [`REFRESH_WINDOW`].

use super::engine::{compute_nonce, pow_digest_hex};
use crate::{Error, Result, client::PuzzleApi, types::PowState, utils::Cancellation};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Safety margin before expiry
pub const REFRESH_WINDOW: Duration = Duration::from_secs(120);

/// Whether a fresh PoW has to be computed at `now`.
///
/// A valid PoW without a known expiry is trusted as-is.
pub fn needs_refresh(state: &PowState, now: DateTime<Utc>) -> bool {
    if !state.has_valid_pow {
        return true;
    }
    match state.expires_at() {
        Some(expires_at) => {
            (expires_at - now).num_milliseconds() < REFRESH_WINDOW.as_millis() as i64
        }
        None => false,
    }
}

/// Make sure the session holds a PoW that outlives the refresh window.
///
/// Returns `true` when a new nonce was computed and verified.
pub async fn ensure_pow<A>(api: &A, cancel: &Cancellation) -> Result<bool>
where
    A: PuzzleApi + ?Sized,
{
    let state = api.pow_status().await?;
    if !needs_refresh(&state, Utc::now()) {
        info!("PoW valid, no refresh needed");
        return Ok(false);
    }
    if state.has_ongoing_challenge {
        warn!("Service reports an unfinished PoW challenge, requesting a new one");
    }

    info!("PoW needs refresh, solving...");
    let challenge = api.pow_challenge().await?;

    let start = Instant::now();
    let worker_cancel = cancel.clone();
    let seed = challenge.challenge.clone();
    let difficulty = challenge.difficulty;
    let nonce = tokio::task::spawn_blocking(move || compute_nonce(&seed, difficulty, &worker_cancel))
        .await
        .map_err(|e| Error::internal(format!("PoW worker failed: {e}")))??;
    info!(
        "PoW found nonce={} difficulty={} (elapsed {:.2?})",
        nonce,
        difficulty,
        start.elapsed()
    );
    debug!("PoW digest {}", pow_digest_hex(&challenge.challenge, &nonce));

    api.pow_verify(&challenge.challenge, &nonce).await?;
    info!("PoW verified");
    Ok(true)
}
