//! Interactive credential prompt

use super::credentials::{AuthMaterial, parse_auth_material};
use crate::{Error, Result};
use async_trait::async_trait;
use std::io::{BufRead, Write};

/// Source of fresh credential material when the stored session is unusable
#[async_trait]
pub trait CredentialPrompt: Send + Sync {
    async fn request(&self) -> Result<AuthMaterial>;
}

/// Reads pasted text from stdin until the first empty line
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_blocking() -> Result<String> {
        let mut stdout = std::io::stdout();
        writeln!(
            stdout,
            "Enter token/cookie (paste cookie / `Cookie: ...` / curl command, end with empty line):"
        )?;
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut lines = Vec::new();
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }
}

#[async_trait]
impl CredentialPrompt for StdinPrompt {
    async fn request(&self) -> Result<AuthMaterial> {
        let text = tokio::task::spawn_blocking(Self::read_blocking)
            .await
            .map_err(|e| Error::internal(format!("prompt task failed: {e}")))??;
        parse_auth_material(&text)
    }
}
