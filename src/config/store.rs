//! Settings stores.

use async_trait::async_trait;
use keyring::Entry;
use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::Settings;
use crate::{Error, ErrorContext, Result};

const KEYRING_SERVICE: &str = "slangshield";

/// Read-only source of the current settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Settings>;
}

/// Fixed settings, for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticSettings(pub Settings);

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn load(&self) -> Result<Settings> {
        Ok(self.0.clone())
    }
}

/// YAML settings file, re-read on every load.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
    keyring: bool,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            keyring: true,
        }
    }

    /// `$SLANGSHIELD_SETTINGS`, else `slangshield.yaml` in the working directory.
    pub fn from_env() -> Self {
        let path = env::var("SLANGSHIELD_SETTINGS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "slangshield.yaml".to_string());
        Self::new(path)
    }

    /// Skip the OS keyring when resolving a missing API key.
    pub fn without_keyring(mut self) -> Self {
        self.keyring = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents as settings. A missing file is empty settings.
    pub async fn read(&self) -> Result<Settings> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file not found, using empty settings");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(Error::settings_with_context(
                    format!("cannot read settings file: {}", e),
                    self.context(),
                ))
            }
        };

        if text.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(&text).map_err(|e| {
            Error::settings_with_context(
                format!("cannot parse settings file: {}", e),
                self.context(),
            )
        })
    }

    /// Validate and write settings as YAML.
    ///
    /// An empty API key is accepted when `load` would resolve one from the keyring
    /// or environment; the resolved key is never written to the file.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let settings = settings.normalized();
        self.with_resolved_key(settings.clone()).await.validate()?;

        let yaml = serde_yaml::to_string(&settings).map_err(|e| {
            Error::settings_with_context(
                format!("cannot serialize settings: {}", e),
                self.context(),
            )
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, yaml).await?;
        Ok(())
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new()
            .with_field_path(self.path.display().to_string())
            .with_source("file_settings_store")
    }

    async fn with_resolved_key(&self, mut settings: Settings) -> Settings {
        if settings.api_key.is_empty() {
            match self.resolve_api_key(&settings.provider).await {
                Some(key) => settings.api_key = key,
                None => warn!(
                    provider = settings.provider.as_str(),
                    "no api key in settings file, keyring or environment"
                ),
            }
        }
        settings
    }

    async fn resolve_api_key(&self, provider_id: &str) -> Option<String> {
        // 1. Keyring
        if self.keyring {
            let user = provider_id.to_string();
            let from_keyring = tokio::task::spawn_blocking(move || {
                Entry::new(KEYRING_SERVICE, &user)
                    .ok()
                    .and_then(|entry| entry.get_password().ok())
            })
            .await
            .ok()
            .flatten()
            .filter(|k| !k.trim().is_empty());
            if from_keyring.is_some() {
                debug!(provider = provider_id, "api key resolved from keyring");
                return from_keyring;
            }
        }

        // 2. PROVIDER_API_KEY, then SLANGSHIELD_API_KEY
        let provider_var = format!("{}_API_KEY", provider_id.to_uppercase());
        [provider_var.as_str(), "SLANGSHIELD_API_KEY"]
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|k| k.trim().to_string())
            .find(|k| !k.is_empty())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Settings> {
        let settings = self.read().await?.normalized();
        Ok(self.with_resolved_key(settings).await)
    }
}
