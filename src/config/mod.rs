//! Configuration management for the solver
//!
//! This module handles loading and persisting the JSON configuration record
//! that carries the session credential and the AI solver settings.

pub mod loader;
pub mod settings;

pub use loader::{ConfigStore, default_config_path};
pub use settings::{AiSettings, AppConfig, Credential, DEFAULT_AI_MODEL, DEFAULT_USER_AGENT};
