//! Session management for the puzzle service
//!
//! This module owns the credential: validating it, re-acquiring it from the
//! user when the service rejects it, parsing pasted browser/cURL material and
//! persisting cookie rotation.

pub mod credentials;
pub mod manager;
pub mod prompt;

pub use credentials::{AuthMaterial, parse_auth_material, url_origin};
pub use manager::SessionManager;
pub use prompt::{CredentialPrompt, StdinPrompt};
