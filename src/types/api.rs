//! Wire records of the puzzle service
//!
//! Every record deserializes leniently: absent fields take their default
//! value, matching how the service omits zero counters.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A puzzle grid, row-major, cells are colour indices
pub type Grid = Vec<Vec<i32>>;

/// The logged-in account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
}

/// Body of `GET /api/auth/me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMe {
    #[serde(default)]
    pub user: UserIdentity,
}

/// Body of `GET /api/daily/remaining`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    #[serde(default)]
    pub remaining: i64,
    #[serde(default)]
    pub completed: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Body of `GET /api/pow/status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowState {
    #[serde(default)]
    pub has_valid_pow: bool,
    /// Expiry in unix milliseconds
    #[serde(default)]
    pub pow_expires_at: i64,
    #[serde(default)]
    pub has_ongoing_challenge: bool,
}

impl PowState {
    /// Expiry as a timestamp, `None` when unset or out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.pow_expires_at <= 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.pow_expires_at).single()
    }
}

/// Body of `POST /api/pow/challenge`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowChallenge {
    pub challenge: String,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default)]
    pub expires_at: i64,
}

/// Body of `POST /api/pow/verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowVerifyRequest {
    pub challenge: String,
    pub nonce: String,
}

/// One demonstration pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleExample {
    #[serde(default)]
    pub input: Grid,
    #[serde(default)]
    pub output: Grid,
}

/// Expected dimensions of the answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSize {
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
}

/// Hints attached to a puzzle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleHints {
    #[serde(default)]
    pub background_color: i32,
    #[serde(default)]
    pub answer_size: AnswerSize,
}

/// A grid-transformation puzzle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    #[serde(default)]
    pub train: Vec<PuzzleExample>,
    #[serde(default)]
    pub test_input: Grid,
    #[serde(default)]
    pub hints: PuzzleHints,
}

/// Body of `GET /api/puzzle/new`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleTicket {
    pub puzzle: Puzzle,
    #[serde(default)]
    pub remaining_attempts: i64,
    #[serde(default)]
    pub daily_remaining: i64,
    #[serde(default)]
    pub daily_limit: i64,
}

/// Body of `POST /api/puzzle/submit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest<'a> {
    pub puzzle_id: &'a str,
    pub answer: &'a Grid,
}

/// Response of `POST /api/puzzle/submit`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub remaining_attempts: i64,
    #[serde(default)]
    pub points_awarded: i64,
    #[serde(default)]
    pub points_balance: i64,
    #[serde(default)]
    pub daily_remaining: i64,
    #[serde(default)]
    pub daily_limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_ticket_from_service_json() {
        let ticket: PuzzleTicket = serde_json::from_value(json!({
            "puzzle": {
                "id": "p-1",
                "train": [{ "input": [[1, 0]], "output": [[0, 1]] }],
                "testInput": [[2, 0]],
                "hints": { "backgroundColor": 0, "answerSize": { "width": 2, "height": 1 } }
            },
            "remainingAttempts": 3,
            "dailyRemaining": 5,
            "dailyLimit": 10
        }))
        .unwrap();

        assert_eq!(ticket.puzzle.id, "p-1");
        assert_eq!(ticket.puzzle.train[0].output, vec![vec![0, 1]]);
        assert_eq!(ticket.puzzle.test_input, vec![vec![2, 0]]);
        assert_eq!(ticket.puzzle.hints.answer_size.width, 2);
        assert_eq!(ticket.daily_remaining, 5);
    }

    #[test]
    fn test_outcome_missing_fields_default() {
        let outcome: SubmissionOutcome =
            serde_json::from_value(json!({ "success": true, "correct": true })).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.daily_remaining, 0);
        assert!(outcome.message.is_empty());
    }

    #[test]
    fn test_submit_request_field_names() {
        let answer = vec![vec![1, 2], vec![3, 4]];
        let value = serde_json::to_value(SubmitRequest {
            puzzle_id: "p-9",
            answer: &answer,
        })
        .unwrap();
        assert_eq!(value, json!({ "puzzleId": "p-9", "answer": [[1, 2], [3, 4]] }));
    }

    #[test]
    fn test_pow_state_expiry() {
        let state: PowState = serde_json::from_value(json!({
            "hasValidPow": true,
            "powExpiresAt": 1_700_000_000_000_i64
        }))
        .unwrap();
        assert!(state.has_valid_pow);
        assert_eq!(state.expires_at().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(PowState::default().expires_at(), None);
    }
}
