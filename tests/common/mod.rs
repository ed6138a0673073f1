//! Common test utilities and helpers
//!
//! Fakes for the collaborator seams plus canned puzzle-service responses for
//! wiremock.

#![allow(dead_code)]

use async_trait::async_trait;
use ergo_solver::{
    Error, Result,
    client::HttpConnector,
    config::ConfigStore,
    orchestrator::{Orchestrator, RunOptions},
    retry::Sleeper,
    session::{AuthMaterial, CredentialPrompt, SessionManager, parse_auth_material},
    solver::{SolveError, Solver},
    types::{Grid, Puzzle},
    utils::Cancellation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Answer every fixture puzzle is solved with
pub fn answer() -> Grid {
    vec![vec![1, 0], vec![0, 1]]
}

/// Solver returning a fixed grid or a fixed error
#[derive(Clone)]
pub struct FixedSolver {
    result: std::result::Result<Grid, SolveError>,
    pub calls: Arc<AtomicUsize>,
}

impl FixedSolver {
    pub fn answering(grid: Grid) -> Self {
        Self {
            result: Ok(grid),
            calls: Arc::default(),
        }
    }

    pub fn failing(err: SolveError) -> Self {
        Self {
            result: Err(err),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Solver for FixedSolver {
    async fn solve(&self, _puzzle: &Puzzle) -> std::result::Result<Grid, SolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Sleeper that records delays and returns at once
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) -> Result<()> {
        self.delays.lock().unwrap().push(duration);
        Ok(())
    }
}

/// Prompt answering with fixed pasted text; `None` fails like empty input
#[derive(Clone, Default)]
pub struct PastePrompt {
    text: Option<String>,
    pub requests: Arc<AtomicUsize>,
}

impl PastePrompt {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialPrompt for PastePrompt {
    async fn request(&self) -> Result<AuthMaterial> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => parse_auth_material(text),
            None => Err(Error::credential_parse("empty input")),
        }
    }
}

/// Write a config file pointing at `base_url`
pub fn write_config(dir: &Path, base_url: &str, cookie: &str) -> PathBuf {
    let path = dir.join("config.json");
    let record = json!({
        "base_url": base_url,
        "cookie": cookie,
        "ai": { "enabled": true, "api_key": "sk-test" }
    });
    std::fs::write(&path, serde_json::to_string_pretty(&record).unwrap()).unwrap();
    path
}

/// Cookie currently stored in the config file at `path`
pub fn stored_cookie(path: &Path) -> String {
    let raw = std::fs::read_to_string(path).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    value["cookie"].as_str().unwrap_or_default().to_string()
}

/// Orchestrator over the real HTTP client with test fakes for the rest
pub fn orchestrator(
    store: ConfigStore,
    prompt: PastePrompt,
    solver: FixedSolver,
    sleeper: RecordingSleeper,
    cancel: Cancellation,
    options: RunOptions,
) -> Orchestrator<HttpConnector, PastePrompt> {
    let session = SessionManager::new(HttpConnector::new(cancel.clone()), prompt, store);
    Orchestrator::new(
        session,
        Arc::new(solver),
        Arc::new(sleeper),
        cancel,
        options,
    )
    .with_rng(StdRng::seed_from_u64(11))
}

pub fn user_json() -> Value {
    json!({ "user": { "id": "u-1", "username": "solver" } })
}

pub fn quota_json(remaining: i64) -> Value {
    json!({ "remaining": remaining, "completed": 10 - remaining, "limit": 10 })
}

/// A PoW that stays valid for another hour
pub fn valid_pow_json() -> Value {
    let expires = chrono::Utc::now().timestamp_millis() + 3_600_000;
    json!({ "hasValidPow": true, "powExpiresAt": expires, "hasOngoingChallenge": false })
}

pub fn ticket_json(id: &str, daily_remaining: i64) -> Value {
    json!({
        "puzzle": {
            "id": id,
            "train": [ { "input": [[0, 1], [1, 0]], "output": [[1, 0], [0, 1]] } ],
            "testInput": [[0, 1], [1, 0]],
            "hints": { "backgroundColor": 0, "answerSize": { "width": 2, "height": 2 } }
        },
        "remainingAttempts": 3,
        "dailyRemaining": daily_remaining,
        "dailyLimit": 10
    })
}

pub fn outcome_json(correct: bool, daily_remaining: i64) -> Value {
    json!({
        "success": true,
        "correct": correct,
        "message": if correct { "well done" } else { "try again" },
        "remainingAttempts": if correct { 3 } else { 2 },
        "pointsAwarded": if correct { 5 } else { 0 },
        "pointsBalance": 105,
        "dailyRemaining": daily_remaining,
        "dailyLimit": 10
    })
}

/// Mount `GET route` answering `body` with status 200
pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a healthy session: accepted cookie, quota left, valid PoW
pub async fn mount_session(server: &MockServer, remaining: i64) {
    mount_get(server, "/api/auth/me", user_json()).await;
    mount_get(server, "/api/daily/remaining", quota_json(remaining)).await;
    mount_get(server, "/api/pow/status", valid_pow_json()).await;
}
