//! Outcome handling
//!
//! Pure functions turning the result of one iteration step into the
//! [`Transition`] the driver applies. No I/O happens here; randomness comes
//! from the caller.

use super::pacing::{PacingKind, pacing_delay};
use crate::{Error, Result, solver::SolveError, types::SubmissionOutcome};
use rand::Rng;
use std::time::Duration;
use tracing::{error, info, warn};

/// Why the loop ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `solved` reached the target count
    TargetReached,
    /// The service reported no attempts left today
    QuotaExhausted,
}

/// How the target count changes after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTarget {
    Unchanged,
    /// Target becomes `solved + 1` so auto mode keeps going
    OneMore,
}

/// What the driver does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session expired: re-authenticate and run the same iteration again
    Retry,
    /// Record `solved`, optionally pause, then continue
    Advance {
        solved: u32,
        pause: Option<Duration>,
        next_target: NextTarget,
    },
    /// End the run successfully
    Stop { solved: u32, reason: StopReason },
}

/// Map a failed fetch or submit onto a transition.
///
/// Quota exhaustion stops, an auth error retries; everything else is fatal.
pub fn on_remote_failure(err: Error, solved: u32) -> Result<Transition> {
    if err.is_quota_exhausted() {
        warn!("stopping: daily limit exhausted ({})", err);
        return Ok(Transition::Stop {
            solved,
            reason: StopReason::QuotaExhausted,
        });
    }
    if err.is_auth() {
        warn!("auth expired ({}), re-authenticating...", err);
        return Ok(Transition::Retry);
    }
    Err(err)
}

/// Map a solver failure onto a transition.
pub fn on_solve_failure<R: Rng>(
    err: SolveError,
    solved: u32,
    auto_loop: bool,
    rng: &mut R,
) -> Result<Transition> {
    match err {
        SolveError::Unavailable(msg) => {
            error!("AI service unavailable");
            Err(Error::AiUnavailable(msg))
        }
        SolveError::Failed(msg) if auto_loop => {
            warn!("AI solve failed: {}, skipping...", msg);
            Ok(Transition::Advance {
                solved,
                pause: Some(pacing_delay(PacingKind::Cooldown, rng)),
                next_target: NextTarget::OneMore,
            })
        }
        SolveError::Failed(msg) => Err(Error::SolveFailed(msg)),
    }
}

/// Map the server's verdict on a submission onto a transition.
pub fn on_submission<R: Rng>(
    outcome: &SubmissionOutcome,
    solved: u32,
    auto_loop: bool,
    rng: &mut R,
) -> Result<Transition> {
    if !outcome.success {
        return Err(Error::SubmitRejected(outcome.message.clone()));
    }
    if !outcome.message.is_empty() {
        info!("submit response: {}", outcome.message);
    }

    if outcome.correct {
        let solved = solved + 1;
        info!(
            "correct: +{} points, balance={}, dailyRemaining={}/{}",
            outcome.points_awarded,
            outcome.points_balance,
            outcome.daily_remaining,
            outcome.daily_limit
        );
        if !auto_loop {
            return Ok(Transition::Advance {
                solved,
                pause: None,
                next_target: NextTarget::Unchanged,
            });
        }
        if outcome.daily_remaining <= 0 {
            return Ok(Transition::Stop {
                solved,
                reason: StopReason::QuotaExhausted,
            });
        }
        return Ok(Transition::Advance {
            solved,
            pause: Some(pacing_delay(PacingKind::Pacing, rng)),
            next_target: NextTarget::OneMore,
        });
    }

    warn!("incorrect: remainingAttempts={}", outcome.remaining_attempts);
    if !auto_loop {
        return Err(Error::IncorrectAnswer);
    }
    warn!("auto mode: answer incorrect, skipping...");
    Ok(Transition::Advance {
        solved,
        pause: Some(pacing_delay(PacingKind::Cooldown, rng)),
        next_target: NextTarget::OneMore,
    })
}
