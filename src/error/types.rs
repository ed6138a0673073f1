//! Error type definitions
//!
//! Defines the main error type used throughout the solver, plus the closed
//! classification of remote failures produced once at the HTTP boundary.

use std::fmt;
use thiserror::Error;

/// Markers the service puts in a 403 message when the daily quota is used up.
///
/// The service has no structured code for this condition, only these phrases
/// ("attempts used up", "already completed", "come back tomorrow").
pub const QUOTA_EXHAUSTED_MARKERS: &[&str] = &["次数已用完", "已完成", "请明天再来"];

/// Classification of a non-2xx response from the puzzle service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// 401/403: the session is not (or no longer) accepted
    Auth,
    /// 429: slow down and retry
    RateLimited,
    /// 403 carrying a quota marker: nothing left to do today
    QuotaExhausted,
    /// Any other status
    Status,
}

impl RemoteErrorKind {
    /// Classify a status code and its human-readable message.
    pub fn classify(status: u16, message: &str) -> Self {
        match status {
            429 => Self::RateLimited,
            403 if QUOTA_EXHAUSTED_MARKERS
                .iter()
                .any(|marker| message.trim().contains(marker)) =>
            {
                Self::QuotaExhausted
            }
            401 | 403 => Self::Auth,
            _ => Self::Status,
        }
    }
}

/// A non-2xx response from the puzzle service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// `message` or `error` field of the body, empty when absent
    pub message: String,
    /// Classification computed from status and message
    pub kind: RemoteErrorKind,
}

impl ApiError {
    /// Build an error and classify it.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = RemoteErrorKind::classify(status, &message);
        Self {
            status,
            message,
            kind,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "api {}", self.status)
        } else {
            write!(f, "api {}: {}", self.status, self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// Main error type for the solver
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The service answered with a non-2xx status
    #[error(transparent)]
    Remote(#[from] ApiError),

    /// A 2xx response without the expected body
    #[error("Empty response body from {endpoint}")]
    EmptyResponse { endpoint: String },

    /// Out-of-range argument to a local computation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The run was interrupted
    #[error("Operation cancelled")]
    Cancelled,

    /// Pasted credential material could not be used
    #[error("Credential parse error: {0}")]
    CredentialParse(String),

    /// Re-entered credentials were rejected as well
    #[error("login still invalid: please check cookie/token")]
    LoginStillInvalid,

    /// The AI service could not be reached or errored
    #[error("AI unavailable: {0}")]
    AiUnavailable(String),

    /// The AI service answered but produced no usable grid
    #[error("AI solve failed: {0}")]
    SolveFailed(String),

    /// The server judged the submitted grid wrong
    #[error("submitted answer was incorrect")]
    IncorrectAnswer,

    /// The server refused the submission outright
    #[error("submit failed: {0}")]
    SubmitRejected(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new credential parse error
    pub fn credential_parse(msg: impl Into<String>) -> Self {
        Self::CredentialParse(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Remote classification, if this error came from a non-2xx response
    pub fn remote_kind(&self) -> Option<RemoteErrorKind> {
        match self {
            Self::Remote(api) => Some(api.kind),
            _ => None,
        }
    }

    /// Whether the session needs to be re-established
    pub fn is_auth(&self) -> bool {
        self.remote_kind() == Some(RemoteErrorKind::Auth)
    }

    /// Whether the service refused the session (401/403).
    ///
    /// Unlike [`Error::is_auth`] this ignores quota markers in the message,
    /// which only mean something on the puzzle endpoints.
    pub fn is_session_rejected(&self) -> bool {
        matches!(self, Self::Remote(api) if matches!(api.status, 401 | 403))
    }

    /// Whether the call should be retried after a backoff
    pub fn is_rate_limited(&self) -> bool {
        self.remote_kind() == Some(RemoteErrorKind::RateLimited)
    }

    /// Whether the daily quota is used up
    pub fn is_quota_exhausted(&self) -> bool {
        self.remote_kind() == Some(RemoteErrorKind::QuotaExhausted)
    }
}
