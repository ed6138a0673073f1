//! ergo-solver - ARC puzzle solving client
//!
//! Drives a puzzle service session end to end: keeps the login cookie valid,
//! computes the proof-of-work the service demands, fetches puzzles, hands them
//! to an AI solver and submits the answers while respecting the daily quota.
//!
//! # Architecture
//!
//! - [`session`]: credential validation, re-acquisition and cookie persistence
//! - [`pow`]: SHA-256 nonce search and the refresh policy around it
//! - [`retry`]: unbounded exponential backoff for rate-limited calls
//! - [`orchestrator`]: the fetch/solve/submit loop with dry-run and auto modes
//! - [`client`]: the [`client::PuzzleApi`] seam and its reqwest implementation
//! - [`solver`]: the [`solver::Solver`] seam and the OpenAI-compatible solver
//!
//! # Examples
//!
//! ```rust
//! use ergo_solver::pow::{compute_nonce, pow_digest_hex};
//! use ergo_solver::utils::Cancellation;
//!
//! let nonce = compute_nonce("challenge", 1, &Cancellation::new()).unwrap();
//! assert!(pow_digest_hex("challenge", &nonce).starts_with('0'));
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pow;
pub mod retry;
pub mod session;
pub mod solver;
pub mod types;
pub mod utils;

pub use config::{AppConfig, ConfigStore, Credential};
pub use error::{ApiError, Error, RemoteErrorKind, Result};
pub use orchestrator::{Orchestrator, RunOptions, RunSummary, StopReason};
pub use session::SessionManager;
