//! External puzzle solver
//!
//! The orchestration loop only sees [`Solver`]. The shipped implementation,
//! [`AiSolver`], asks an OpenAI-compatible chat completion endpoint for the
//! answer and has the model double-check it.

pub mod ai;
pub mod grid;

pub use ai::AiSolver;
pub use grid::{find_matching_bracket, normalize_grid, parse_answer_grid, validate_answer_size};

use crate::{
    Error,
    types::{Grid, Puzzle},
};
use async_trait::async_trait;
use thiserror::Error as ThisError;

/// Why a solve attempt produced no answer
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The reasoning service could not be reached or answered with an error
    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    /// The service answered but no acceptable grid came out of it
    #[error("{0}")]
    Failed(String),
}

impl From<SolveError> for Error {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::Unavailable(msg) => Error::AiUnavailable(msg),
            SolveError::Failed(msg) => Error::SolveFailed(msg),
        }
    }
}

/// Produces an answer grid for a puzzle
#[async_trait]
pub trait Solver: Send + Sync {
    async fn solve(&self, puzzle: &Puzzle) -> Result<Grid, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_error_maps_to_taxonomy() {
        let err: Error = SolveError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, Error::AiUnavailable(_)));

        let err: Error = SolveError::Failed("empty grid".to_string()).into();
        assert_eq!(err.to_string(), "AI solve failed: empty grid");
    }
}
