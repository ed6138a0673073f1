//! Error handling for the solver
//!
//! This module defines the error types and the remote-failure taxonomy used
//! throughout the application.

pub mod types;

pub use types::{ApiError, Error, QUOTA_EXHAUSTED_MARKERS, RemoteErrorKind, Result};
