//! Gemini Generate API 驱动 — 实现 Google Gemini 特有的请求/响应格式转换
//!
//! Google Gemini generateContent API driver. Key differences:
//! - Uses `contents` instead of `messages`, with `parts` instead of `content`.
//! - Roles: `user` and `model` (not `assistant`).
//! - `generationConfig` wraps temperature and `maxOutputTokens`.
//! - The model is part of the URL path; the key goes in `x-goog-api-key`.
//! - Response: `candidates[0].content.parts[].text`, finish signal in `finishReason`.

use serde_json::Value;
use std::collections::HashMap;
use url::Url;

use crate::config::ProviderKind;
use crate::error::Error;
use crate::transport::TransportError;
use crate::types::{Message, MessageRole, ProviderResponse};
use crate::Result;

use super::{join_text_fields, DriverRequest, ProviderDriver, MAX_OUTPUT_TOKENS, TEMPERATURE};

pub const DEFAULT_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini generateContent API driver.
#[derive(Debug)]
pub struct GeminiDriver {
    root: String,
}

impl GeminiDriver {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// `{root}/models/{model}:generateContent`, with the model encoded as one path segment.
    pub fn endpoint(&self, model: &str) -> Result<String> {
        let invalid = |reason: String| {
            Error::provider(
                ProviderKind::Gemini,
                TransportError::InvalidUrl(format!("{} ({})", self.root, reason)),
            )
        };

        let mut url = Url::parse(&self.root).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".into()))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{}:generateContent", model));
        Ok(url.into())
    }

    fn role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }
}

impl ProviderDriver for GeminiDriver {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn build_request(
        &self,
        messages: &[Message],
        model: &str,
        api_key: &str,
    ) -> Result<DriverRequest> {
        let contents: Vec<Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": Self::role(m.role),
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        let body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        });

        let mut headers = HashMap::new();
        headers.insert("x-goog-api-key".into(), api_key.to_string());

        Ok(DriverRequest {
            url: self.endpoint(model)?,
            headers,
            body,
        })
    }

    fn parse_response(&self, body: &Value) -> ProviderResponse {
        let candidate = body.pointer("/candidates/0");
        let text = join_text_fields(candidate.and_then(|c| c.pointer("/content/parts")));
        let truncated = candidate
            .and_then(|c| c.get("finishReason"))
            .and_then(|v| v.as_str())
            .map(|r| r.to_uppercase().contains("MAX_TOKENS"))
            .unwrap_or(false);
        ProviderResponse { text, truncated }
    }
}
