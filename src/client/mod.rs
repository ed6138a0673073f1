//! Remote puzzle service client
//!
//! [`PuzzleApi`] is the seam between the core logic and the HTTP transport:
//! the session manager, PoW refresh and orchestration loop only ever talk to
//! the trait, and [`ApiConnector`] rebuilds a client whenever the credential
//! changes.

pub mod cookies;
pub mod http;

pub use cookies::{canonical_cookie, parse_cookie_pairs};
pub use http::{ApiClient, HttpConnector, MAX_RESPONSE_BYTES, REQUEST_TIMEOUT};

use crate::{
    Result,
    config::Credential,
    types::{AuthMe, Grid, PowChallenge, PowState, PuzzleTicket, QuotaStatus, SubmissionOutcome},
};
use async_trait::async_trait;

/// Operations offered by the puzzle service.
///
/// Non-2xx answers surface as [`crate::Error::Remote`] with the status already
/// classified.
#[async_trait]
pub trait PuzzleApi: Send + Sync {
    /// `GET /api/auth/me`
    async fn auth_me(&self) -> Result<AuthMe>;

    /// `GET /api/daily/remaining`
    async fn daily_remaining(&self) -> Result<QuotaStatus>;

    /// `GET /api/pow/status`
    async fn pow_status(&self) -> Result<PowState>;

    /// `POST /api/pow/challenge`
    async fn pow_challenge(&self) -> Result<PowChallenge>;

    /// `POST /api/pow/verify`
    async fn pow_verify(&self, challenge: &str, nonce: &str) -> Result<()>;

    /// `GET /api/puzzle/new`
    async fn puzzle_new(&self) -> Result<PuzzleTicket>;

    /// `POST /api/puzzle/submit`
    async fn puzzle_submit(&self, puzzle_id: &str, answer: &Grid) -> Result<SubmissionOutcome>;

    /// Canonical cookie string the transport currently holds
    fn cookie_header(&self) -> String;
}

/// Creates a [`PuzzleApi`] from a credential
pub trait ApiConnector: Send + Sync {
    type Api: PuzzleApi;

    fn connect(&self, credential: &Credential) -> Result<Self::Api>;
}
