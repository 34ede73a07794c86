//! Anthropic Messages API 驱动 — 实现 Anthropic 特有的请求/响应格式转换
//!
//! Anthropic Messages API driver. Differences from OpenAI:
//! - Auth uses `x-api-key` plus a fixed `anthropic-version` header.
//! - `max_tokens` is required; no temperature is sent.
//! - Response text lives in `content[].text`, the finish signal in `stop_reason`.

use serde_json::Value;
use std::collections::HashMap;

use crate::config::ProviderKind;
use crate::types::{Message, ProviderResponse};
use crate::Result;

use super::{join_text_fields, DriverRequest, ProviderDriver, MAX_OUTPUT_TOKENS};

pub const DEFAULT_ROOT: &str = "https://api.anthropic.com/v1";
pub const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API driver.
#[derive(Debug)]
pub struct AnthropicDriver {
    root: String,
}

impl AnthropicDriver {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
        }
    }
}

impl ProviderDriver for AnthropicDriver {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn build_request(
        &self,
        messages: &[Message],
        model: &str,
        api_key: &str,
    ) -> Result<DriverRequest> {
        let msgs: Vec<Value> = messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let body = serde_json::json!({
            "model": model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": msgs,
        });

        let mut headers = HashMap::new();
        headers.insert("x-api-key".into(), api_key.to_string());
        headers.insert("anthropic-version".into(), API_VERSION.into());

        Ok(DriverRequest {
            url: format!("{}/messages", self.root),
            headers,
            body,
        })
    }

    fn parse_response(&self, body: &Value) -> ProviderResponse {
        // { content: [{type: "text", text: "..."}], stop_reason }
        let text = join_text_fields(body.get("content"));
        let truncated = body.get("stop_reason").and_then(|v| v.as_str()) == Some("max_tokens");
        ProviderResponse { text, truncated }
    }
}
