//! OpenAI Chat Completions driver, shared by `openai` and `openai_compat`.

use serde_json::Value;
use std::collections::HashMap;

use crate::config::ProviderKind;
use crate::types::{Message, ProviderResponse};
use crate::Result;

use super::{DriverRequest, ProviderDriver, MAX_OUTPUT_TOKENS, TEMPERATURE};

pub const DEFAULT_ROOT: &str = "https://api.openai.com/v1";

#[derive(Debug)]
pub struct OpenAiDriver {
    provider: ProviderKind,
    root: String,
}

impl OpenAiDriver {
    pub fn openai(root: impl Into<String>) -> Self {
        Self::with_root(ProviderKind::OpenAi, root.into())
    }

    /// A user-configured OpenAI-compatible server.
    pub fn compatible(base_url: impl Into<String>) -> Self {
        Self::with_root(ProviderKind::OpenAiCompat, base_url.into())
    }

    fn with_root(provider: ProviderKind, root: String) -> Self {
        Self {
            provider,
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.root)
    }
}

impl ProviderDriver for OpenAiDriver {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    fn build_request(
        &self,
        messages: &[Message],
        model: &str,
        api_key: &str,
    ) -> Result<DriverRequest> {
        let oai_messages: Vec<Value> = messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let body = serde_json::json!({
            "model": model,
            "messages": oai_messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_OUTPUT_TOKENS,
        });

        let mut headers = HashMap::new();
        headers.insert("authorization".into(), format!("Bearer {}", api_key));

        Ok(DriverRequest {
            url: self.endpoint(),
            headers,
            body,
        })
    }

    fn parse_response(&self, body: &Value) -> ProviderResponse {
        let text = body
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        let truncated = body
            .pointer("/choices/0/finish_reason")
            .and_then(|v| v.as_str())
            == Some("length");

        ProviderResponse { text, truncated }
    }
}
