//! reqwest-backed implementation of [`PuzzleApi`]
//!
//! Cookies live in a [`Jar`] seeded from the stored credential, so any
//! `Set-Cookie` the service sends is applied to later requests and shows up
//! in [`PuzzleApi::cookie_header`].

use super::cookies::{canonical_cookie, parse_cookie_pairs};
use super::{ApiConnector, PuzzleApi};
use crate::{
    ApiError, Error, Result,
    config::Credential,
    types::{
        AuthMe, Grid, PowChallenge, PowState, PowVerifyRequest, PuzzleTicket, QuotaStatus,
        SubmissionOutcome, SubmitRequest,
    },
    utils::Cancellation,
};
use async_trait::async_trait;
use reqwest::{
    Client, Method, Url,
    cookie::{CookieStore, Jar},
    header::{ACCEPT, HeaderMap, HeaderValue, REFERER},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fixed deadline of every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response body accepted
pub const MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;

/// HTTP client for the puzzle service
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    /// Service root without a trailing slash
    base: String,
    /// Root as a URL, used for cookie lookups
    base_url: Url,
    jar: Arc<Jar>,
    initial_cookie: String,
    cancel: Cancellation,
}

impl ApiClient {
    /// Build a client for the given credential.
    pub fn new(credential: &Credential, cancel: Cancellation) -> Result<Self> {
        let base = credential.base_url.trim().trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(Error::config("base_url is required"));
        }
        let base_url = Url::parse(&format!("{base}/"))
            .map_err(|e| Error::config(format!("invalid base_url: {e}")))?;

        let jar = Arc::new(Jar::default());
        for (name, value) in parse_cookie_pairs(&credential.cookie) {
            jar.add_cookie_str(&format!("{name}={value}; Path=/"), &base_url);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let referer = HeaderValue::from_str(base_url.as_str())
            .map_err(|e| Error::config(format!("invalid base_url: {e}")))?;
        headers.insert(REFERER, referer);

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(credential.user_agent.clone())
            .cookie_provider(jar.clone())
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base,
            base_url,
            jar,
            initial_cookie: credential.cookie.trim().to_string(),
            cancel,
        })
    }

    /// Service root without a trailing slash
    pub fn base(&self) -> &str {
        &self.base
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let bytes = self.send(method, path, body).await?;
        decode(path, &bytes)
    }

    /// Send one request, racing the run's cancellation.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<u8>> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Error::Cancelled),
            res = self.exchange(method, path, body) => res,
        }
    }

    async fn exchange(&self, method: Method, path: &str, body: Option<Value>) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base, path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let mut response = request.send().await?;
        let status = response.status();

        if response
            .content_length()
            .is_some_and(|len| len > MAX_RESPONSE_BYTES as u64)
        {
            return Err(oversized(path));
        }
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if !append_capped(&mut bytes, &chunk, MAX_RESPONSE_BYTES) {
                return Err(oversized(path));
            }
        }

        if !status.is_success() {
            let error = ApiError::new(status.as_u16(), error_message(&bytes));
            debug!("{} failed: {} ({:?})", path, error, error.kind);
            return Err(error.into());
        }
        Ok(bytes)
    }
}

/// Append `chunk` unless that would take `body` past `limit`.
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], limit: usize) -> bool {
    if body.len() + chunk.len() > limit {
        return false;
    }
    body.extend_from_slice(chunk);
    true
}

fn oversized(path: &str) -> Error {
    Error::internal(format!(
        "response from {path} exceeds {MAX_RESPONSE_BYTES} bytes"
    ))
}

/// Human-readable text of an error body: `message`, else `error`.
pub(crate) fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return String::new();
    };
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::EmptyResponse {
            endpoint: path.to_string(),
        });
    }
    Ok(serde_json::from_slice(body)?)
}

#[async_trait]
impl PuzzleApi for ApiClient {
    async fn auth_me(&self) -> Result<AuthMe> {
        self.call(Method::GET, "/api/auth/me", None).await
    }

    async fn daily_remaining(&self) -> Result<QuotaStatus> {
        self.call(Method::GET, "/api/daily/remaining", None).await
    }

    async fn pow_status(&self) -> Result<PowState> {
        self.call(Method::GET, "/api/pow/status", None).await
    }

    async fn pow_challenge(&self) -> Result<PowChallenge> {
        self.call(Method::POST, "/api/pow/challenge", Some(Value::Object(Default::default())))
            .await
    }

    async fn pow_verify(&self, challenge: &str, nonce: &str) -> Result<()> {
        let body = serde_json::to_value(PowVerifyRequest {
            challenge: challenge.to_string(),
            nonce: nonce.to_string(),
        })?;
        self.send(Method::POST, "/api/pow/verify", Some(body))
            .await
            .map(|_| ())
    }

    async fn puzzle_new(&self) -> Result<PuzzleTicket> {
        self.call(Method::GET, "/api/puzzle/new", None).await
    }

    async fn puzzle_submit(&self, puzzle_id: &str, answer: &Grid) -> Result<SubmissionOutcome> {
        let body = serde_json::to_value(SubmitRequest { puzzle_id, answer })?;
        self.call(Method::POST, "/api/puzzle/submit", Some(body))
            .await
    }

    fn cookie_header(&self) -> String {
        let current = self
            .jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .unwrap_or_default();
        if current.trim().is_empty() {
            canonical_cookie(&self.initial_cookie)
        } else {
            canonical_cookie(&current)
        }
    }
}

/// Builds [`ApiClient`]s that share the run's cancellation signal
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    cancel: Cancellation,
}

impl HttpConnector {
    pub fn new(cancel: Cancellation) -> Self {
        Self { cancel }
    }
}

impl ApiConnector for HttpConnector {
    type Api = ApiClient;

    fn connect(&self, credential: &Credential) -> Result<ApiClient> {
        ApiClient::new(credential, self.cancel.clone())
    }
}
