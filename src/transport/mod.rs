//! HTTP transport with a bounded per-call timeout and normalized failures.

pub mod http;

pub use http::{HttpTransport, TransportConfig, DEFAULT_TIMEOUT};

use std::time::Duration;

/// Maximum number of characters of an error body kept for diagnostics.
pub const BODY_EXCERPT_CHARS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP {status}{}", excerpt_suffix(.body_excerpt))]
    Status { status: u16, body_excerpt: String },

    #[error("HTTP {status} returned malformed JSON{}", excerpt_suffix(.body_excerpt))]
    MalformedBody { status: u16, body_excerpt: String },

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

fn excerpt_suffix(excerpt: &str) -> String {
    if excerpt.is_empty() {
        String::new()
    } else {
        format!(" — {}", excerpt)
    }
}

impl TransportError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(timeout)
        } else {
            TransportError::Network(e)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }

    /// Non-2xx answers and unparseable 2xx bodies are both HTTP-class failures.
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            TransportError::Status { .. } | TransportError::MalformedBody { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } | TransportError::MalformedBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Truncate a response body to [`BODY_EXCERPT_CHARS`] characters.
pub fn body_excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
