//! Nonce search
//!
//! Finds the smallest decimal nonce `n` such that
//! `sha256(challenge + n)` starts with `difficulty` zero hex nibbles.

use crate::{Error, Result, utils::Cancellation};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tracing::info;

/// Largest difficulty: every nibble of the 256-bit digest is zero
pub const MAX_DIFFICULTY: i32 = 64;

/// Attempts between two cancellation checks
pub const CHECK_EVERY: u64 = 100_000;

/// Minimum spacing of progress events
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Whether `digest` starts with `difficulty` zero nibbles.
///
/// `difficulty` must already be within `0..=64`.
pub fn has_leading_zero_nibbles(digest: &[u8], difficulty: usize) -> bool {
    let full_bytes = difficulty / 2;
    if digest.len() < full_bytes || digest[..full_bytes].iter().any(|&b| b != 0) {
        return false;
    }
    if difficulty % 2 == 1 {
        return digest.get(full_bytes).is_some_and(|b| b & 0xF0 == 0);
    }
    true
}

/// Hex digest of `challenge + nonce`, as the service recomputes it on verify
pub fn pow_digest_hex(challenge: &str, nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(challenge.as_bytes());
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}

/// Search for the smallest nonce satisfying `difficulty`.
///
/// Blocks the calling thread. Polls `cancel` every [`CHECK_EVERY`] attempts and
/// returns [`Error::Cancelled`] once it fires. There is no attempt cap.
pub fn compute_nonce(challenge: &str, difficulty: i32, cancel: &Cancellation) -> Result<String> {
    if !(0..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(Error::InvalidParameter(format!(
            "invalid difficulty: {difficulty}"
        )));
    }
    let difficulty = difficulty as usize;

    let mut prefix = Sha256::new();
    prefix.update(challenge.as_bytes());

    let start = Instant::now();
    let mut next_log_at = start + PROGRESS_INTERVAL;
    let mut nonce = String::with_capacity(20);

    for attempt in 0u64.. {
        if attempt % CHECK_EVERY == 0 {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let now = Instant::now();
            if attempt > 0 && now >= next_log_at {
                let elapsed = now - start;
                let rate = attempt as f64 / elapsed.as_secs_f64();
                info!(
                    "PoW in progress: difficulty={} attempts={} rate={:.0}/s elapsed={:.1?}",
                    difficulty, attempt, rate, elapsed
                );
                next_log_at = now + PROGRESS_INTERVAL;
            }
        }

        nonce.clear();
        write!(nonce, "{attempt}").map_err(|e| Error::internal(format!("format nonce: {e}")))?;
        let mut hasher = prefix.clone();
        hasher.update(nonce.as_bytes());
        let digest = hasher.finalize();

        if has_leading_zero_nibbles(&digest, difficulty) {
            return Ok(nonce);
        }
    }

    Err(Error::internal("nonce space exhausted"))
}
