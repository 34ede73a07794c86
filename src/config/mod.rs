//! Provider settings: raw stored values, validation, and the injected store.
//!
//! Settings are loaded from a [`SettingsStore`] right before every request and
//! never cached, so edits take effect on the next call.

pub mod store;

pub use store::{FileSettingsStore, SettingsStore, StaticSettings};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Supported LLM vendors/endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openai_compat")]
    OpenAiCompat,
    #[serde(rename = "anthropic")]
    Anthropic,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Gemini,
        ProviderKind::OpenAi,
        ProviderKind::OpenAiCompat,
        ProviderKind::Anthropic,
    ];

    /// Identifier as stored in settings.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenAiCompat => "openai_compat",
            ProviderKind::Anthropic => "anthropic",
        }
    }

    /// Name used as the prefix of provider error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi | ProviderKind::OpenAiCompat => "OpenAI-compatible",
            ProviderKind::Anthropic => "Anthropic",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAi | ProviderKind::OpenAiCompat => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
        }
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAiCompat => Some("http://localhost:4000/v1"),
            _ => None,
        }
    }

    pub fn requires_base_url(&self) -> bool {
        matches!(self, ProviderKind::OpenAiCompat)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProviderKind::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| Error::UnsupportedProvider {
                provider: s.to_string(),
            })
    }
}

/// A required setting, named in [`Error::MissingSetting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    ApiKey,
    Model,
    BaseUrl,
}

impl SettingField {
    /// Key of the field in the settings store.
    pub fn key(&self) -> &'static str {
        match self {
            SettingField::ApiKey => "apiKey",
            SettingField::Model => "model",
            SettingField::BaseUrl => "baseUrl",
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingField::ApiKey => "API key",
            SettingField::Model => "Model",
            SettingField::BaseUrl => "Custom base URL",
        })
    }
}

/// Settings exactly as the store holds them. Any field may be empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub provider: String,
    #[serde(default, alias = "apiKey")]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, alias = "baseUrl")]
    pub base_url: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl Settings {
    pub fn new(
        provider: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: String::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Trim every value; an empty provider means gemini.
    pub fn normalized(&self) -> Self {
        let provider = self.provider.trim();
        Self {
            provider: if provider.is_empty() {
                ProviderKind::Gemini.id().to_string()
            } else {
                provider.to_string()
            },
            api_key: self.api_key.trim().to_string(),
            model: self.model.trim().to_string(),
            base_url: self.base_url.trim().to_string(),
        }
    }

    /// Fill an empty model (and an empty openai_compat base URL) with the provider default.
    /// Unknown providers are left untouched.
    pub fn with_provider_defaults(&self) -> Self {
        let mut out = self.normalized();
        if let Ok(kind) = out.provider.parse::<ProviderKind>() {
            if out.model.is_empty() {
                out.model = kind.default_model().to_string();
            }
            if out.base_url.is_empty() {
                if let Some(url) = kind.default_base_url() {
                    out.base_url = url.to_string();
                }
            }
        }
        out
    }

    /// Check required fields in precedence order: API key, model, then base URL
    /// for openai_compat. The provider id is resolved last.
    pub fn validate(&self) -> Result<ProviderConfig> {
        let s = self.normalized();

        if s.api_key.is_empty() {
            return Err(Error::MissingSetting {
                field: SettingField::ApiKey,
            });
        }
        if s.model.is_empty() {
            return Err(Error::MissingSetting {
                field: SettingField::Model,
            });
        }
        if s.provider == ProviderKind::OpenAiCompat.id() && s.base_url.is_empty() {
            return Err(Error::MissingSetting {
                field: SettingField::BaseUrl,
            });
        }

        let provider: ProviderKind = s.provider.parse()?;
        let base_url = if provider.requires_base_url() {
            Some(s.base_url)
        } else {
            None
        };

        Ok(ProviderConfig {
            provider,
            api_key: s.api_key,
            model: s.model,
            base_url,
        })
    }
}

/// Validated provider configuration for one request.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    /// Present iff `provider` is openai_compat.
    pub base_url: Option<String>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}
