use crate::client::core::Formalizer;
use crate::transport::{HttpTransport, TransportConfig};
use crate::Result;
use std::time::Duration;

/// Builder for [`Formalizer`].
///
/// Starts from the environment (`SLANGSHIELD_HTTP_TIMEOUT_SECS`,
/// `SLANGSHIELD_PROXY_URL`); explicit setters win.
pub struct FormalizerBuilder {
    transport: TransportConfig,
    /// Override vendor root URLs (primarily for testing with mock servers)
    base_url_override: Option<String>,
}

impl FormalizerBuilder {
    pub fn new() -> Self {
        Self {
            transport: TransportConfig::from_env(),
            base_url_override: None,
        }
    }

    /// Per-call timeout. One formalize may make two calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = timeout;
        self
    }

    pub fn proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.transport.proxy_url = Some(proxy_url.into());
        self
    }

    /// Replace the fixed Gemini, OpenAI and Anthropic roots.
    ///
    /// Requests keep their vendor paths (`/models/{model}:generateContent`,
    /// `/chat/completions`, `/messages`). openai_compat is not affected: it always
    /// uses its configured base URL.
    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn build(self) -> Result<Formalizer> {
        let transport = HttpTransport::new(&self.transport)?;
        Ok(Formalizer {
            transport,
            base_url_override: self.base_url_override,
        })
    }
}

impl Default for FormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
