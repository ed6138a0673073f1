//! ergo-solver binary
//!
//! # Usage
//!
//! ```bash
//! ergo-solver solve --count 3
//! ergo-solver solve --auto --config ./config.json
//! ergo-solver solve --dry-run --verbose
//! ```

use clap::{Parser, Subcommand};
use ergo_solver::cli::{SolveArgs, run_solve_mode};
use std::path::PathBuf;

/// ARC puzzle solver: keeps the session and proof-of-work fresh, asks an AI
/// service for answers and submits them at a human pace
#[derive(Parser)]
#[command(name = "ergo-solver", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve puzzles until the count is reached or the daily quota is used up
    Solve {
        /// Config file (default: <config dir>/ergo-solver/config.json)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Number of puzzles to solve
        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        count: u32,

        /// Solve without submitting answers
        #[arg(long)]
        dry_run: bool,

        /// Keep solving with randomised pauses until the daily quota runs out
        #[arg(long)]
        auto: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            config,
            count,
            dry_run,
            auto,
            verbose,
        } => {
            let args = SolveArgs {
                config,
                count,
                dry_run,
                auto_loop: auto,
                verbose,
            };
            if let Err(err) = run_solve_mode(args).await {
                tracing::error!("{:#}", err);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
