//! Orchestration loop driver
//!
//! Preflight (session, quota, PoW) runs once, then each iteration fetches a
//! puzzle, solves it and submits the answer. Every step ends in a
//! [`Transition`] that the driver applies to its counters.

use super::transition::{
    NextTarget, StopReason, Transition, on_remote_failure, on_solve_failure, on_submission,
};
use crate::{
    Error, Result,
    client::{ApiConnector, PuzzleApi},
    config::AppConfig,
    pow::ensure_pow,
    retry::{Sleeper, retry_rate_limited},
    session::{CredentialPrompt, SessionManager},
    solver::Solver,
    utils::Cancellation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Flags of one `solve` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Puzzles to solve; the starting target in auto mode
    pub count: u32,
    /// Solve without submitting
    pub dry_run: bool,
    /// Keep going with human-like pauses until the quota runs out
    pub auto_loop: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            count: 1,
            dry_run: false,
            auto_loop: false,
        }
    }
}

/// Result of a run that ended without a fatal error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub solved: u32,
    /// Target count when the loop ended
    pub target: u32,
    pub elapsed: Duration,
    pub reason: StopReason,
    /// Credential as it stands at the end of the run
    pub config: AppConfig,
}

/// The puzzle-solving loop
pub struct Orchestrator<C, P> {
    session: SessionManager<C, P>,
    solver: Arc<dyn Solver>,
    sleeper: Arc<dyn Sleeper>,
    cancel: Cancellation,
    options: RunOptions,
    rng: StdRng,
}

impl<C, P> Orchestrator<C, P>
where
    C: ApiConnector,
    P: CredentialPrompt,
{
    pub fn new(
        session: SessionManager<C, P>,
        solver: Arc<dyn Solver>,
        sleeper: Arc<dyn Sleeper>,
        cancel: Cancellation,
        options: RunOptions,
    ) -> Self {
        Self {
            session,
            solver,
            sleeper,
            cancel,
            options,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the randomness source used for pauses
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Run until the target is reached, the quota is exhausted or a fatal
    /// error occurs.
    pub async fn run(mut self, config: AppConfig) -> Result<RunSummary> {
        let started = Instant::now();
        let options = self.options;
        info!(
            "starting: count={} dry_run={} auto_loop={}",
            options.count, options.dry_run, options.auto_loop
        );

        let mut config = self.session.ensure_authenticated(config).await?;
        let mut api = self.session.connect(&config)?;
        let me = self.session.whoami(&api).await?;
        config = self.session.persist_if_changed(config, &api);
        info!("logged in: {}({})", me.username, me.id);
        info!("site: {}", config.credential.base_url);

        let mut solved = 0u32;
        let mut target = options.count;

        match api.daily_remaining().await {
            Ok(quota) => {
                info!(
                    "daily quota: remaining={} completed={} limit={}",
                    quota.remaining, quota.completed, quota.limit
                );
                if quota.remaining <= 0 {
                    warn!("stopping: daily limit exhausted");
                    return Ok(self.finish(
                        solved,
                        target,
                        StopReason::QuotaExhausted,
                        started,
                        config,
                    ));
                }
            }
            Err(Error::Cancelled) => return Err(Error::Cancelled),
            Err(err) => warn!(
                "failed to query daily quota: {} (will try fetching puzzle)",
                err
            ),
        }

        ensure_pow(&api, &self.cancel).await?;
        config = self.session.persist_if_changed(config, &api);

        while solved < target {
            match self.iteration(&api, &mut config, solved, target).await? {
                Transition::Retry => {
                    config = self.session.ensure_authenticated(config).await?;
                    api = self.session.connect(&config)?;
                }
                Transition::Advance {
                    solved: now_solved,
                    pause,
                    next_target,
                } => {
                    solved = now_solved;
                    if next_target == NextTarget::OneMore {
                        target = solved + 1;
                    }
                    if let Some(pause) = pause {
                        info!("sleeping {:?} before continuing...", pause);
                        self.sleeper.sleep(pause).await?;
                    }
                }
                Transition::Stop {
                    solved: now_solved,
                    reason,
                } => {
                    return Ok(self.finish(now_solved, target, reason, started, config));
                }
            }
        }

        let reason = if options.auto_loop {
            StopReason::QuotaExhausted
        } else {
            StopReason::TargetReached
        };
        Ok(self.finish(solved, target, reason, started, config))
    }

    async fn iteration(
        &mut self,
        api: &C::Api,
        config: &mut AppConfig,
        solved: u32,
        target: u32,
    ) -> Result<Transition> {
        let options = self.options;

        info!("fetching puzzle: index={}/{}", solved + 1, target);
        let fetched =
            retry_rate_limited("fetch puzzle", self.sleeper.as_ref(), || api.puzzle_new()).await;
        let ticket = match fetched {
            Ok(ticket) => ticket,
            Err(err) => return on_remote_failure(err, solved),
        };
        self.persist(config, api);

        if ticket.daily_remaining <= 0 {
            warn!("stopping: daily limit exhausted");
            return Ok(Transition::Stop {
                solved,
                reason: StopReason::QuotaExhausted,
            });
        }
        let puzzle = &ticket.puzzle;
        info!(
            "puzzle fetched: puzzleId={}, remainingAttempts={}, dailyRemaining={}/{}",
            puzzle.id, ticket.remaining_attempts, ticket.daily_remaining, ticket.daily_limit
        );

        let started = Instant::now();
        let solved_grid = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = self.solver.solve(puzzle) => result,
        };
        let answer = match solved_grid {
            Ok(answer) => answer,
            Err(err) => return on_solve_failure(err, solved, options.auto_loop, &mut self.rng),
        };
        info!("AI solved (elapsed {:.2?})", started.elapsed());

        if options.dry_run {
            info!(
                "dry-run: puzzleId={} answer generated but not submitted",
                puzzle.id
            );
            return Ok(Transition::Advance {
                solved: solved + 1,
                pause: None,
                next_target: NextTarget::Unchanged,
            });
        }

        ensure_pow(api, &self.cancel).await?;
        self.persist(config, api);

        info!("submitting: puzzleId={}", puzzle.id);
        let submitted = retry_rate_limited("submit", self.sleeper.as_ref(), || {
            api.puzzle_submit(&puzzle.id, &answer)
        })
        .await;
        let outcome = match submitted {
            Ok(outcome) => outcome,
            Err(err) => return on_remote_failure(err, solved),
        };
        self.persist(config, api);

        on_submission(&outcome, solved, options.auto_loop, &mut self.rng)
    }

    fn persist(&self, config: &mut AppConfig, api: &C::Api) {
        *config = self.session.persist_if_changed(std::mem::take(config), api);
    }

    fn finish(
        &self,
        solved: u32,
        target: u32,
        reason: StopReason,
        started: Instant,
        config: AppConfig,
    ) -> RunSummary {
        let elapsed = started.elapsed();
        match reason {
            StopReason::QuotaExhausted if self.options.auto_loop => info!(
                "auto mode complete: daily limit exhausted, solved {} puzzles, elapsed {:.0?}",
                solved, elapsed
            ),
            StopReason::QuotaExhausted => info!(
                "stopped: daily limit exhausted, solved={}/{} elapsed={:.1?}",
                solved, target, elapsed
            ),
            StopReason::TargetReached => info!(
                "done: solved={}/{} elapsed={:.1?}",
                solved, target, elapsed
            ),
        }
        RunSummary {
            solved,
            target,
            elapsed,
            reason,
            config,
        }
    }
}
