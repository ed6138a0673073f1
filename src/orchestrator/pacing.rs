//! Randomised pauses between iterations

use rand::Rng;
use std::time::Duration;

/// Which pause to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingKind {
    /// After a failed solve or a wrong answer: 30 to 59 seconds
    Cooldown,
    /// After a correct answer in auto mode: 60 to 300 seconds
    Pacing,
}

/// Draw a pause length for `kind` from `rng`
pub fn pacing_delay<R: Rng>(kind: PacingKind, rng: &mut R) -> Duration {
    let secs = match kind {
        PacingKind::Cooldown => rng.random_range(30..60),
        PacingKind::Pacing => rng.random_range(60..=300),
    };
    Duration::from_secs(secs)
}
