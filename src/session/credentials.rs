//! Credential material parsing
//!
//! Accepts whatever a user copies out of the browser: a bare cookie string, a
//! `Cookie:` header line, or a whole "Copy as cURL" command.

use crate::{Error, Result, config::Credential};
use regex::Regex;
use tracing::debug;
use url::Url;

const CURL_COOKIE_QUOTED: &str = r#"(?s)(?:^|\s)-b\s+(?:'([^']*)'|"([^"]*)")"#;
const CURL_COOKIE_UNQUOTED: &str = r#"(?m)(?:^|\s)-b\s+([^\s\\'"]+)"#;
const HEADER_COOKIE: &str = r#"(?im)^\s*(?:-H\s+)?['"]?cookie\s*:\s*(.*?)['"]?\s*\\?\s*$"#;
const HEADER_USER_AGENT: &str = r#"(?im)^\s*(?:-H\s+)?['"]?user-agent\s*:\s*(.*?)['"]?\s*\\?\s*$"#;
const ANY_URL: &str = r#"https?://[^\s'"\\]+"#;

/// What could be extracted from pasted text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthMaterial {
    pub cookie: String,
    pub user_agent: Option<String>,
    /// Origin of the first URL in the text
    pub base_url: Option<String>,
}

impl AuthMaterial {
    /// Merge into a stored credential.
    ///
    /// The cookie always replaces the stored one, the user agent only when
    /// present, the base URL only when none is configured yet.
    pub fn apply_to(&self, credential: &mut Credential) {
        credential.cookie = self.cookie.clone();
        if let Some(user_agent) = &self.user_agent {
            credential.user_agent = user_agent.clone();
        }
        if let Some(base_url) = &self.base_url
            && credential.base_url.trim().is_empty()
        {
            credential.base_url = base_url.clone();
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::internal(format!("bad pattern {pattern}: {e}")))
}

fn clean(value: &str) -> String {
    value.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string()
}

fn first_group(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| clean(m.as_str()))
        .find(|value| !value.is_empty())
}

/// Origin (`scheme://host[:port]`) of an absolute URL
pub fn url_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

/// Extract cookie, user agent and base URL from pasted text.
///
/// Cookie sources in order: `-b '...'`, a `Cookie:` header, an unquoted
/// `-b value`, and finally the whole text when it looks like `name=value`.
pub fn parse_auth_material(text: &str) -> Result<AuthMaterial> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::credential_parse("empty input"));
    }

    let quoted = compile(CURL_COOKIE_QUOTED)?;
    let header = compile(HEADER_COOKIE)?;
    let unquoted = compile(CURL_COOKIE_UNQUOTED)?;
    let mut cookie = first_group(&quoted, text)
        .or_else(|| first_group(&header, text))
        .or_else(|| first_group(&unquoted, text));

    let looks_like_curl = text.starts_with("curl ") || text.contains("\n  -H ");
    if cookie.is_none() && !looks_like_curl && text.contains('=') {
        let line = text.strip_prefix("Cookie:").unwrap_or(text);
        let line = clean(line);
        if !line.is_empty() {
            cookie = Some(line);
        }
    }

    let Some(cookie) = cookie else {
        return Err(Error::credential_parse(
            "cookie not found: paste `-b '...'` content or `Cookie: ...`",
        ));
    };

    let user_agent = first_group(&compile(HEADER_USER_AGENT)?, text);
    let base_url = compile(ANY_URL)?
        .find(text)
        .and_then(|m| url_origin(m.as_str()));

    debug!(
        "Parsed credential material: cookie_len={}, user_agent={}, base_url={:?}",
        cookie.len(),
        user_agent.is_some(),
        base_url
    );
    Ok(AuthMaterial {
        cookie,
        user_agent,
        base_url,
    })
}
