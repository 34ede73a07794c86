use crate::config::{ProviderKind, SettingField};
use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or setting key that caused the error (e.g., "settings.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error
    pub details: Option<String>,
    /// Source of the error (e.g., "settings_store", "request_validator")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for slangshield.
///
/// Configuration problems (`MissingSetting`, `UnsupportedProvider`) are raised
/// before any I/O. Everything that happens on the wire is wrapped in
/// `Provider` so the message carries the vendor name.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} is not configured")]
    MissingSetting { field: SettingField },

    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    #[error("{provider} {source}")]
    Provider {
        provider: ProviderKind,
        #[source]
        source: TransportError,
    },

    #[error("The field is empty.")]
    EmptyText,

    #[error("Timeout: no response. Try again.")]
    DeadlineExceeded,

    #[error("Settings error: {message}{}", format_context(.context))]
    Settings {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new settings error with structured context
    pub fn settings_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Settings {
            message: msg.into(),
            context,
        }
    }

    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub(crate) fn provider(provider: ProviderKind, source: TransportError) -> Self {
        Error::Provider { provider, source }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Settings { context, .. } | Error::Validation { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the error was raised by a per-call timeout or the caller's outer deadline.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::DeadlineExceeded => true,
            Error::Provider { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// HTTP status of the failed exchange, when the provider answered at all.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Provider { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True for errors that are raised before any request leaves the process.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingSetting { .. } | Error::UnsupportedProvider { .. }
        )
    }
}
