//! Request and result values of a formalize operation

use serde::{Deserialize, Serialize};

use crate::lang::Language;

/// One user action: the drafted text and, optionally, its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalizeRequest {
    pub text: String,
    /// Detected from `text` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl FormalizeRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }
}

/// Text and finish signal extracted from one provider answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Trimmed output text; empty when the answer carried none.
    pub text: String,
    /// The provider stopped because of its output-length limit.
    pub truncated: bool,
}

/// Terminal state of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// First pass was complete.
    Complete,
    /// First pass was truncated and the continuation was appended.
    Continued,
    /// First pass was truncated and the continuation failed; only the first pass is kept.
    ContinuationFailed,
}

impl Completion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Completion::Complete => "complete",
            Completion::Continued => "continued",
            Completion::ContinuationFailed => "continuation_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formalized {
    pub text: String,
    pub completion: Completion,
}

/// Answer handed back to the UI collaborator. Exactly one of `output`/`error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalizeResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FormalizeResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            ok: true,
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            output: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> std::result::Result<String, String> {
        if self.ok {
            Ok(self.output.unwrap_or_default())
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

impl From<crate::Result<Formalized>> for FormalizeResult {
    fn from(r: crate::Result<Formalized>) -> Self {
        match r {
            Ok(f) => FormalizeResult::success(f.text),
            Err(e) => FormalizeResult::failure(e.to_string()),
        }
    }
}
