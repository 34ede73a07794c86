//! Inbound boundary for UI collaborators.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SettingsStore;
use crate::lang::detect_language;
use crate::prompt::build_prompt;
use crate::types::{FormalizeRequest, FormalizeResult, Formalized};
use crate::{Error, Result};

use super::core::Formalizer;

/// Loads settings, builds the prompt and dispatches, once per user action.
#[derive(Clone)]
pub struct FormalizeService {
    formalizer: Formalizer,
    store: Arc<dyn SettingsStore>,
    deadline: Option<Duration>,
}

impl FormalizeService {
    pub fn new(formalizer: Formalizer, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            formalizer,
            store,
            deadline: None,
        }
    }

    /// Outer wall-clock guard over the whole request, on top of the per-call timeout.
    pub fn request_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Never fails: every error is flattened into `{ok: false, error}`.
    pub async fn handle(&self, request: FormalizeRequest) -> FormalizeResult {
        self.run(request).await.into()
    }

    /// Structured variant of [`handle`](Self::handle).
    pub async fn run(&self, request: FormalizeRequest) -> Result<Formalized> {
        if request.text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.dispatch(request))
                .await
                .unwrap_or(Err(Error::DeadlineExceeded)),
            None => self.dispatch(request).await,
        }
    }

    async fn dispatch(&self, request: FormalizeRequest) -> Result<Formalized> {
        let language = request
            .language
            .unwrap_or_else(|| detect_language(&request.text));

        // Re-read on every request so settings edits apply immediately.
        let config = self.store.load().await?.validate().map_err(|e| {
            if let Error::MissingSetting { field } = &e {
                warn!(setting = field.key(), "slangshield settings incomplete");
            }
            e
        })?;
        debug!(
            provider = config.provider.id(),
            language = language.code(),
            "slangshield dispatching request"
        );

        let prompt = build_prompt(&request.text, language);
        self.formalizer.formalize(&config, &prompt).await
    }
}
