//! CLI mode logic
//!
//! Argument parsing lives in the binary; this module holds what the `solve`
//! command does once its arguments are known.

pub mod logging;
pub mod solve;

pub use logging::init_logging;
pub use solve::{SolveArgs, run_solve_mode};
