//! Provider 驱动抽象层 — 通过 trait 实现多厂商 API 适配的动态分发
//!
//! Provider driver abstraction layer. Each vendor wire protocol implements
//! [`ProviderDriver`]: one request builder (endpoint, auth headers, body) and one
//! response parser (text extractor plus truncation predicate). The dispatcher's
//! control flow is identical across providers and only ever talks to
//! `Box<dyn ProviderDriver>`.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use serde_json::Value;
use std::collections::HashMap;

use crate::config::{ProviderConfig, ProviderKind};
use crate::types::{Message, ProviderResponse};
use crate::Result;

pub use anthropic::AnthropicDriver;
pub use gemini::GeminiDriver;
pub use openai::OpenAiDriver;

/// Sampling temperature for providers that accept one.
pub const TEMPERATURE: f64 = 0.3;

/// Output token cap sent with every request.
pub const MAX_OUTPUT_TOKENS: u32 = 2500;

/// Provider-specific HTTP request, always a JSON POST.
#[derive(Debug, Clone)]
pub struct DriverRequest {
    /// Full endpoint URL.
    pub url: String,
    /// Auth and versioning headers. `content-type` is set by the transport.
    pub headers: HashMap<String, String>,
    /// Serialized JSON request body.
    pub body: Value,
}

/// Core trait for provider-specific API adaptation.
pub trait ProviderDriver: Send + Sync + std::fmt::Debug {
    fn provider(&self) -> ProviderKind;

    /// Build the HTTP request for `messages`.
    fn build_request(&self, messages: &[Message], model: &str, api_key: &str)
        -> Result<DriverRequest>;

    /// Extract output text and the truncation flag. Missing fields yield empty text.
    fn parse_response(&self, body: &Value) -> ProviderResponse;
}

/// Create the driver for a validated config.
///
/// `base_url_override` replaces the fixed vendor roots (for mock servers);
/// openai_compat always uses its configured base URL.
pub fn create_driver(
    config: &ProviderConfig,
    base_url_override: Option<&str>,
) -> Box<dyn ProviderDriver> {
    match config.provider {
        ProviderKind::Gemini => Box::new(GeminiDriver::new(
            base_url_override.unwrap_or(gemini::DEFAULT_ROOT),
        )),
        ProviderKind::OpenAi => Box::new(OpenAiDriver::openai(
            base_url_override.unwrap_or(openai::DEFAULT_ROOT),
        )),
        ProviderKind::OpenAiCompat => Box::new(OpenAiDriver::compatible(
            config.base_url.as_deref().unwrap_or_default(),
        )),
        ProviderKind::Anthropic => Box::new(AnthropicDriver::new(
            base_url_override.unwrap_or(anthropic::DEFAULT_ROOT),
        )),
    }
}

/// Concatenate the `text` fields of an array of parts/blocks, then trim.
pub(crate) fn join_text_fields(items: Option<&Value>) -> String {
    items
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .map(|item| item.get("text").and_then(|t| t.as_str()).unwrap_or(""))
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}
