//! Orchestration loop
//!
//! `CheckQuota → EnsurePow → FetchPuzzle → Solve → (DryRun | EnsurePow → Submit)
//! → HandleOutcome`, repeated until the target count is reached or the daily
//! quota runs out.

pub mod pacing;
pub mod runner;
pub mod transition;

pub use pacing::{PacingKind, pacing_delay};
pub use runner::{Orchestrator, RunOptions, RunSummary};
pub use transition::{
    NextTarget, StopReason, Transition, on_remote_failure, on_solve_failure, on_submission,
};
