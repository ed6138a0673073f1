//! Proof-of-work engine
//!
//! [`compute_nonce`] is the CPU-bound search; [`ensure_pow`] applies the
//! refresh policy against the remote service and runs the search on the
//! blocking pool.

pub mod engine;
pub mod refresh;

pub use engine::{
    CHECK_EVERY, MAX_DIFFICULTY, compute_nonce, has_leading_zero_nibbles, pow_digest_hex,
};
pub use refresh::{REFRESH_WINDOW, ensure_pow, needs_refresh};
