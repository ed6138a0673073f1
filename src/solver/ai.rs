//! OpenAI-compatible solver
//!
//! Sends the puzzle to `POST {base}/chat/completions` with a strict JSON
//! schema response format, then runs a second "verify" completion over the
//! proposed grid.

use super::{
    SolveError, Solver,
    grid::{normalize_grid, parse_answer_grid, validate_answer_size},
};
use crate::{
    Error, Result,
    config::AiSettings,
    types::{Grid, Puzzle},
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Endpoint root used when `ai.base_url` is empty
pub const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment fallback for `ai.api_key`
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const SOLVE_SYSTEM_PROMPT: &str = r#"You solve ARC (Abstraction and Reasoning Corpus) grid puzzles.

Work through it in order:
1. Find the objects in each training input (connected cells of one colour).
2. Compare every training input with its output and name the transformation.
3. Express it with grid primitives: recolour, flood fill, rotate, flip, translate,
   scale, crop, tile, overlay, mask, mirror, count, sort, border, connect.
4. Apply exactly that transformation to the test input.
5. Check the output dimensions against the hint before answering.

Reply with a single JSON object and nothing else:
{"reasoning": "...", "answer": [[...], ...], "confidence": 0-100}

Every row of "answer" must have the same length. Only report confidence of 90
or more when the rule explains every training pair."#;

const VERIFY_SYSTEM_PROMPT: &str = r#"You check proposed answers to ARC grid puzzles.

Derive the transformation from the training pairs, apply it to the test input
and compare the result with the proposed answer cell by cell. Be strict: answer
valid=true only when you are confident the proposed grid is exactly right.

Reply with a single JSON object: {"valid": true|false, "reasoning": "..."}"#;

/// Structured answer requested from the model
#[derive(Debug, Deserialize)]
struct ModelAnswer {
    #[serde(default)]
    reasoning: String,
    answer: Grid,
    #[serde(default)]
    confidence: i64,
}

/// Structured verdict of the verify pass
#[derive(Debug, Deserialize)]
struct Verdict {
    valid: bool,
    #[serde(default)]
    reasoning: String,
}

fn answer_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "reasoning": {
                "type": "string",
                "description": "Step-by-step reasoning about the transformation"
            },
            "answer": {
                "type": "array",
                "description": "Output grid, one array per row",
                "items": { "type": "array", "items": { "type": "integer" } }
            },
            "confidence": { "type": "integer", "description": "Confidence 0-100" }
        },
        "required": ["reasoning", "answer", "confidence"],
        "additionalProperties": false
    })
}

fn verdict_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "valid": { "type": "boolean", "description": "Whether the answer is right" },
            "reasoning": { "type": "string", "description": "Why" }
        },
        "required": ["valid", "reasoning"],
        "additionalProperties": false
    })
}

fn json_schema_format(name: &str, description: &str, schema: Value) -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            name: name.to_string(),
            description: Some(description.to_string()),
            schema: Some(schema),
            strict: Some(true),
        },
    }
}

/// Chat-completion backed [`Solver`]
#[derive(Debug, Clone)]
pub struct AiSolver {
    client: Client<OpenAIConfig>,
    api_base: String,
    model: String,
    timeout: Duration,
}

impl AiSolver {
    /// Build a solver from settings, falling back to `OPENAI_API_KEY`.
    ///
    /// A disabled solver or a missing key is a configuration error.
    pub fn from_settings(settings: &AiSettings) -> Result<Self> {
        if !settings.enabled {
            return Err(Error::config("AI solver not configured (ai.enabled is false)"));
        }
        let mut api_key = settings.api_key.trim().to_string();
        if api_key.is_empty() {
            api_key = std::env::var(API_KEY_ENV)
                .map(|key| key.trim().to_string())
                .unwrap_or_default();
        }
        if api_key.is_empty() {
            return Err(Error::config(format!(
                "missing API key (set ai.api_key in config or {API_KEY_ENV} env)"
            )));
        }

        let base = match settings.base_url.trim() {
            "" => DEFAULT_AI_BASE_URL,
            custom => {
                info!("AI using custom endpoint: {}", custom);
                custom
            }
        };
        Ok(Self::new(base, api_key, settings.model.trim(), settings.timeout()))
    }

    /// Build a solver for an explicit endpoint root
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let api_base = base_url.trim_end_matches('/').to_string();
        let api_key: String = api_key.into();
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&api_base);
        Self {
            client: Client::with_config(config),
            api_base,
            model: model.into(),
            timeout,
        }
    }

    /// Model requested from the endpoint
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint root requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn complete(
        &self,
        system: &str,
        user: String,
        response_format: ResponseFormat,
    ) -> std::result::Result<String, SolveError> {
        let build_failed = |e: async_openai::error::OpenAIError| {
            SolveError::Failed(format!("build completion request: {e}"))
        };
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system)
                    .build()
                    .map_err(build_failed)?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user)
                    .build()
                    .map_err(build_failed)?,
            ),
        ];
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .build()
            .map_err(build_failed)?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| SolveError::Unavailable(format!("no reply within {:?}", self.timeout)))?
            .map_err(|e| {
                warn!("AI API call failed: {}", e);
                SolveError::Unavailable(e.to_string())
            })?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

/// Ask the model whether `answer` solves `puzzle`.
    async fn verify(&self, puzzle_json: &str, answer: &Grid) -> std::result::Result<bool, String> {
        let answer_json = serde_json::to_string(answer).map_err(|e| e.to_string())?;
        let query = format!(
            "Verify this ARC puzzle answer.\n\n## Puzzle (training pairs and test input)\n{puzzle_json}\n\n## Proposed answer\n{answer_json}\n\nDoes the proposed answer follow the transformation shown by the training pairs?"
        );
        let content = self
            .complete(
                VERIFY_SYSTEM_PROMPT,
                query,
                json_schema_format("verify_response", "Verdict on a proposed answer", verdict_schema()),
            )
            .await
            .map_err(|e| e.to_string())?;
        if content.trim().is_empty() {
            return Err("no content in verify response".to_string());
        }

        let verdict = match serde_json::from_str::<Verdict>(&content) {
            Ok(verdict) => verdict,
            Err(_) => {
                let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) else {
                    return Err("invalid verify response format".to_string());
                };
                if end <= start {
                    return Err("invalid verify response format".to_string());
                }
                serde_json::from_str::<Verdict>(&content[start..=end])
                    .map_err(|e| format!("parse verify response: {e}"))?
            }
        };
        if !verdict.reasoning.is_empty() {
            info!("Verification: {}", verdict.reasoning);
        }
        Ok(verdict.valid)
    }
}

#[async_trait]
impl Solver for AiSolver {
    async fn solve(&self, puzzle: &Puzzle) -> std::result::Result<Grid, SolveError> {
        let puzzle_json = serde_json::to_string_pretty(puzzle)
            .map_err(|e| SolveError::Failed(format!("marshal puzzle: {e}")))?;
        let size = puzzle.hints.answer_size;
        let query = format!(
            "Solve this ARC puzzle:\n\n{puzzle_json}\n\nThe answer must be exactly {h} rows by {w} columns: {h} rows, each with {w} elements. Check the dimensions before replying.",
            h = size.height,
            w = size.width,
        );

        info!("AI solving puzzle {} with model {}", puzzle.id, self.model);
        let start = Instant::now();
        let content = self
            .complete(
                SOLVE_SYSTEM_PROMPT,
                query,
                json_schema_format("arc_answer", "ARC puzzle answer", answer_schema()),
            )
            .await?;
        debug!("AI completion after {:.1?}", start.elapsed());
        if content.trim().is_empty() {
            return Err(SolveError::Failed("no content in response".to_string()));
        }

        let answer = match serde_json::from_str::<ModelAnswer>(&content) {
            Ok(answer) => answer,
            Err(_) => {
                warn!("AI reply is not the requested object, extracting a grid");
                return parse_answer_grid(&content);
            }
        };
        if !answer.reasoning.is_empty() {
            info!("AI reasoning: {}", answer.reasoning);
        }
        info!("AI confidence: {}%", answer.confidence);

        if answer.answer.is_empty() {
            return Err(SolveError::Failed("empty answer grid".to_string()));
        }
        let grid = normalize_grid(answer.answer)?;
        if let Err(mismatch) = validate_answer_size(puzzle, &grid) {
            warn!("answer size mismatch: {}", mismatch);
        }

        match self.verify(&puzzle_json, &grid).await {
            Ok(true) => info!("AI self-verification passed"),
            Ok(false) => {
                return Err(SolveError::Failed(
                    "AI self-verification failed: answer does not match pattern".to_string(),
                ));
            }
            Err(err) => warn!("verification error: {}", err),
        }
        Ok(grid)
    }
}
