//! `solve` command
//!
//! Loads the configuration, builds the AI solver and the HTTP session, wires
//! Ctrl-C to the run's cancellation signal and drives the orchestration loop.

use super::logging::init_logging;
use crate::{
    client::HttpConnector,
    config::{ConfigStore, default_config_path},
    orchestrator::{Orchestrator, RunOptions, RunSummary},
    retry::TokioSleeper,
    session::{SessionManager, StdinPrompt},
    solver::AiSolver,
    utils::{Cancellation, version},
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Arguments for the `solve` command
#[derive(Debug, Clone)]
pub struct SolveArgs {
    pub config: Option<PathBuf>,
    pub count: u32,
    pub dry_run: bool,
    pub auto_loop: bool,
    pub verbose: bool,
}

impl SolveArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            count: self.count,
            dry_run: self.dry_run,
            auto_loop: self.auto_loop,
        }
    }
}

/// Run the `solve` command with the given arguments
pub async fn run_solve_mode(args: SolveArgs) -> Result<RunSummary> {
    init_logging(args.verbose);
    info!("ergo-solver v{}", version::get_version());

    let path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let store = ConfigStore::new(path);
    let config = store.load()?;

    let solver = AiSolver::from_settings(&config.ai)?;
    info!("AI solver ready: model={}", solver.model());

    let cancel = Cancellation::new();
    let signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping...");
            signal.cancel();
        }
    });

    let session = SessionManager::new(HttpConnector::new(cancel.clone()), StdinPrompt, store);
    let orchestrator = Orchestrator::new(
        session,
        Arc::new(solver),
        Arc::new(TokioSleeper::new(cancel.clone())),
        cancel,
        args.run_options(),
    );

    Ok(orchestrator.run(config).await?)
}
