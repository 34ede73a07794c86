use crate::config::ProviderConfig;
use crate::drivers::{create_driver, ProviderDriver};
use crate::prompt::CONTINUE_PROMPT;
use crate::transport::HttpTransport;
use crate::types::message::{continuation_conversation, primary_conversation};
use crate::types::{Completion, Formalized, Message, ProviderResponse};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::builder::FormalizerBuilder;

/// Provider dispatcher: one primary call, plus at most one continuation when the
/// primary answer was cut by the output-length limit.
#[derive(Debug, Clone)]
pub struct Formalizer {
    pub(crate) transport: HttpTransport,
    pub(crate) base_url_override: Option<String>,
}

impl Formalizer {
    pub fn builder() -> FormalizerBuilder {
        FormalizerBuilder::new()
    }

    /// Dispatcher with default transport settings (env-overridable).
    pub fn new() -> Result<Self> {
        FormalizerBuilder::new().build()
    }

    /// Run the primary/continuation sequence for `prompt`.
    ///
    /// Primary failures abort. Continuation failures keep the first-pass text.
    pub async fn formalize(&self, config: &ProviderConfig, prompt: &str) -> Result<Formalized> {
        let request_id = Uuid::new_v4().to_string();
        let driver = create_driver(config, self.base_url_override.as_deref());

        let first = self
            .call(driver.as_ref(), &primary_conversation(prompt), config, &request_id, "primary")
            .await?;

        if !first.truncated {
            return Ok(self.finish(config, &request_id, first.text, Completion::Complete));
        }

        // A truncated continuation is not continued again.
        let messages = continuation_conversation(prompt, &first.text, CONTINUE_PROMPT);
        match self
            .call(driver.as_ref(), &messages, config, &request_id, "continuation")
            .await
        {
            Ok(second) => {
                let text = format!("{}\n{}", first.text, second.text).trim().to_string();
                Ok(self.finish(config, &request_id, text, Completion::Continued))
            }
            Err(e @ Error::Provider { .. }) => {
                warn!(
                    provider = config.provider.id(),
                    request_id = request_id.as_str(),
                    http_status = e.http_status(),
                    timeout = e.is_timeout(),
                    error = %e,
                    "slangshield continuation failed, keeping first pass"
                );
                Ok(self.finish(config, &request_id, first.text, Completion::ContinuationFailed))
            }
            Err(e) => Err(e),
        }
    }

    async fn call(
        &self,
        driver: &dyn ProviderDriver,
        messages: &[Message],
        config: &ProviderConfig,
        request_id: &str,
        phase: &'static str,
    ) -> Result<ProviderResponse> {
        let request = driver.build_request(messages, &config.model, &config.api_key)?;

        let start = Instant::now();
        let body = self
            .transport
            .post_json(&request, Some(request_id))
            .await
            .map_err(|e| {
                info!(
                    provider = config.provider.id(),
                    model = config.model.as_str(),
                    request_id,
                    phase,
                    http_status = e.status(),
                    http_error = e.is_http(),
                    duration_ms = start.elapsed().as_millis(),
                    "slangshield request failed"
                );
                Error::provider(driver.provider(), e)
            })?;

        let response = driver.parse_response(&body);
        info!(
            provider = config.provider.id(),
            model = config.model.as_str(),
            request_id,
            phase,
            truncated = response.truncated,
            output_chars = response.text.chars().count(),
            duration_ms = start.elapsed().as_millis(),
            "slangshield request completed"
        );
        Ok(response)
    }

    fn finish(
        &self,
        config: &ProviderConfig,
        request_id: &str,
        text: String,
        completion: Completion,
    ) -> Formalized {
        info!(
            provider = config.provider.id(),
            request_id,
            completion = completion.as_str(),
            "slangshield formalize finished"
        );
        Formalized { text, completion }
    }
}
