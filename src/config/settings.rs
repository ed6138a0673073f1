//! Configuration record
//!
//! Defines the persisted configuration: the session credential plus the AI
//! solver sub-configuration. The whole record is rewritten whenever the
//! credential changes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Desktop browser user agent used when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Model requested from the AI service when none is configured
pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Upper bound for one AI completion
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 300;

/// Session material for the puzzle service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Service root, e.g. `https://example.org`
    #[serde(default)]
    pub base_url: String,
    /// `name=value; name2=value2` cookie string
    #[serde(default)]
    pub cookie: String,
    /// User agent sent with every request
    #[serde(default)]
    pub user_agent: String,
}

impl Default for Credential {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cookie: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Credential {
    /// Whether a cookie is present at all
    pub fn has_cookie(&self) -> bool {
        !self.cookie.trim().is_empty()
    }
}

/// AI solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    /// Whether the AI solver may be used
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// OpenAI-compatible endpoint root; empty means the public API
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,
    /// API key; empty means `OPENAI_API_KEY`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Per-completion timeout in seconds
    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_ai_timeout_secs() -> u64 {
    DEFAULT_AI_TIMEOUT_SECS
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: DEFAULT_AI_MODEL.to_string(),
            base_url: String::new(),
            api_key: String::new(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    /// Completion timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// The persisted configuration record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session credential, stored flat at the top level
    #[serde(flatten)]
    pub credential: Credential,
    /// AI solver settings
    #[serde(default)]
    pub ai: AiSettings,
}

impl AppConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim user-editable fields and restore defaults for blanks
    pub fn normalize(mut self) -> Self {
        self.credential.base_url = self.credential.base_url.trim().to_string();
        self.credential.cookie = self.credential.cookie.trim().to_string();
        self.credential.user_agent = self.credential.user_agent.trim().to_string();
        if self.credential.user_agent.is_empty() {
            self.credential.user_agent = DEFAULT_USER_AGENT.to_string();
        }
        if self.ai.model.trim().is_empty() {
            self.ai.model = DEFAULT_AI_MODEL.to_string();
        }
        self
    }
}
