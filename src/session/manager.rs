//! Session manager
//!
//! Owns the credential lifecycle: validates the stored cookie against
//! `/api/auth/me`, asks for new material when it is missing or rejected, and
//! writes server-side cookie rotation back to the config file.
//!
//! The credential travels as an owned [`AppConfig`]; every operation that may
//! change it hands back the updated copy.

use super::prompt::CredentialPrompt;
use crate::{
    Error, Result,
    client::{ApiConnector, PuzzleApi, canonical_cookie},
    config::{AppConfig, ConfigStore},
    types::UserIdentity,
};
use tracing::{debug, info, warn};

/// Session manager over a connector (how to reach the service) and a prompt
/// (where new credentials come from)
#[derive(Debug)]
pub struct SessionManager<C, P> {
    connector: C,
    prompt: P,
    store: ConfigStore,
}

impl<C, P> SessionManager<C, P>
where
    C: ApiConnector,
    P: CredentialPrompt,
{
    pub fn new(connector: C, prompt: P, store: ConfigStore) -> Self {
        Self {
            connector,
            prompt,
            store,
        }
    }

    /// Config file backing this session
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Build a client for the current credential
    pub fn connect(&self, config: &AppConfig) -> Result<C::Api> {
        self.connector.connect(&config.credential)
    }

    /// Return a configuration whose cookie the service accepts.
    ///
    /// An empty cookie is prompted for up front. A rejected cookie (any 401 or
    /// 403 from `/api/auth/me`) is prompted for once more; a second rejection
    /// is [`Error::LoginStillInvalid`].
    /// Errors other than 401/403 abort immediately.
    pub async fn ensure_authenticated(&self, mut config: AppConfig) -> Result<AppConfig> {
        if !config.credential.has_cookie() {
            info!("No stored cookie, credential material required");
            self.accept_new_material(&mut config).await?;
        }

        match self.validate(&config).await {
            Ok(_) => return Ok(config),
            Err(err) if err.is_session_rejected() => {
                warn!("Stored session rejected ({}), credential material required", err);
            }
            Err(err) => return Err(err),
        }

        self.accept_new_material(&mut config).await?;
        match self.validate(&config).await {
            Ok(_) => Ok(config),
            Err(err) if err.is_session_rejected() => Err(Error::LoginStillInvalid),
            Err(err) => Err(err),
        }
    }

    /// Identity behind the client's session
    pub async fn whoami(&self, api: &C::Api) -> Result<UserIdentity> {
        Ok(api.auth_me().await?.user)
    }

    /// Store the transport's cookie if it differs from the recorded one.
    ///
    /// Failing to write the file only logs a warning; the in-memory copy is
    /// updated either way.
    pub fn persist_if_changed(&self, mut config: AppConfig, api: &C::Api) -> AppConfig {
        let current = api.cookie_header();
        if current.is_empty() || current == canonical_cookie(&config.credential.cookie) {
            return config;
        }

        config.credential.cookie = current;
        match self.store.save(&config) {
            Ok(()) => info!("config.json updated (cookie refreshed)"),
            Err(err) => warn!("Failed to persist refreshed cookie: {}", err),
        }
        config
    }

    async fn validate(&self, config: &AppConfig) -> Result<UserIdentity> {
        if config.credential.base_url.trim().is_empty() {
            return Err(Error::config("base_url is required in config"));
        }
        let api = self.connect(config)?;
        let user = self.whoami(&api).await?;
        debug!("Session accepted for {}({})", user.username, user.id);
        Ok(user)
    }

    async fn accept_new_material(&self, config: &mut AppConfig) -> Result<()> {
        let material = self.prompt.request().await?;
        material.apply_to(&mut config.credential);
        self.store.save(config)?;
        info!("config.json updated (cookie saved)");
        Ok(())
    }
}
