//! Type definitions for the puzzle service
//!
//! This module contains the request and response records exchanged with the
//! remote API.

pub mod api;

pub use api::{
    AnswerSize, AuthMe, Grid, PowChallenge, PowState, PowVerifyRequest, Puzzle, PuzzleExample,
    PuzzleHints, PuzzleTicket, QuotaStatus, SubmissionOutcome, SubmitRequest, UserIdentity,
};
