//! Configuration loading and persistence
//!
//! Reads the JSON configuration record and writes it back atomically
//! (temp file, then rename) whenever the credential changes.

use crate::{
    Error, Result,
    config::{AppConfig, Credential},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "ergo-solver";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Default config location: `<config dir>/ergo-solver/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| Error::config("cannot determine config directory, pass --config"))?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads and saves the configuration record at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration.
    ///
    /// A missing file yields defaults so that pasted credential material can
    /// bootstrap a fresh setup. An existing file must name a `base_url`.
    pub fn load(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            warn!(
                "Configuration file not found: {:?}, starting from defaults",
                self.path
            );
            return Ok(AppConfig::default());
        }

        info!("Loading configuration from file: {:?}", self.path);
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| Error::config(format!("read {}: {}", self.path.display(), e)))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("parse {}: {}", self.path.display(), e)))?;
        let config = config.normalize();

        if config.credential.base_url.is_empty() {
            return Err(Error::config("base_url is required in config"));
        }

        debug!(
            "Configuration loaded: base_url={}, cookie_set={}, ai_enabled={}",
            config.credential.base_url,
            config.credential.has_cookie(),
            config.ai.enabled
        );
        Ok(config)
    }

    /// Write the configuration atomically.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        let mut record = config.clone();
        if record.credential.user_agent.trim().is_empty() {
            record.credential = Credential {
                user_agent: Credential::default().user_agent,
                ..record.credential
            };
        }

        let mut body = serde_json::to_vec_pretty(&record)?;
        body.push(b'\n');

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let tmp = self.temp_path();
        write_private(&tmp, &body)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Configuration written to {:?}", self.path);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.json"));

        let config = store.load().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{
  "base_url": "https://puzzles.example/",
  "cookie": " sid=abc ",
  "user_agent": "",
  "ai": {{ "model": "local-model", "base_url": "http://127.0.0.1:8000/v1" }}
}}"#
        )
        .unwrap();

        let config = ConfigStore::new(temp_file.path()).load().unwrap();
        assert_eq!(config.credential.base_url, "https://puzzles.example/");
        assert_eq!(config.credential.cookie, "sid=abc");
        assert_eq!(config.credential.user_agent, DEFAULT_USER_AGENT);
        assert!(config.ai.enabled);
        assert_eq!(config.ai.model, "local-model");
    }

    #[test]
    fn test_load_requires_base_url() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{ "cookie": "sid=abc" }}"#).unwrap();

        let err = ConfigStore::new(temp_file.path()).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("base_url is required"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "{{ not json").unwrap();

        let err = ConfigStore::new(temp_file.path()).load().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = ConfigStore::new(&path);

        let mut config = AppConfig::default();
        config.credential.base_url = "https://puzzles.example".to_string();
        config.credential.cookie = "a=1; b=2".to_string();
        store.save(&config).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("config.json.tmp").exists());
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("}\n"));

        let loaded = store.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.credential.base_url = "https://puzzles.example".to_string();
        ConfigStore::new(&path).save(&config).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_default_config_path_shape() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with("ergo-solver/config.json"));
        }
    }
}
