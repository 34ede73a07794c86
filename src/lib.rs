//! # slangshield
//!
//! 将草拟的邮件文本改写为正式语体，支持多家大模型厂商。
//!
//! Rewrite drafted email text into a formal register by delegating to a
//! third-party LLM API (Gemini, OpenAI, any OpenAI-compatible server, or Anthropic).
//!
//! ## Overview
//!
//! One user action becomes one or two HTTP round trips:
//!
//! 1. the settings store is read and validated (API key, model, base URL);
//! 2. a fixed instruction prompt is rendered around the user's text;
//! 3. the provider driver sends the primary request;
//! 4. if the provider reports the answer was cut by its output limit, exactly one
//!    "continue" request is sent and the two segments are joined.
//!
//! A failed continuation never loses the first pass.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use slangshield::{FormalizeRequest, FormalizeService, Formalizer, Settings, StaticSettings};
//!
//! #[tokio::main]
//! async fn main() -> slangshield::Result<()> {
//!     let store = StaticSettings(Settings::new("openai", "sk-...", "gpt-4o-mini"));
//!     let service = FormalizeService::new(Formalizer::new()?, Arc::new(store));
//!
//!     let result = service
//!         .handle(FormalizeRequest::new("hey, send me the report asap"))
//!         .await;
//!     println!("{}", serde_json::to_string(&result).unwrap());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Dispatcher and request service |
//! | [`config`] | Settings, validation and settings stores |
//! | [`drivers`] | Per-vendor request builders and response parsers |
//! | [`transport`] | HTTP with a bounded per-call timeout |
//! | [`prompt`] | Rewrite and continuation prompts |
//! | [`lang`] | IT/EN language detection |
//! | [`types`] | Requests, results and messages |

pub mod client;
pub mod config;
pub mod drivers;
pub mod lang;
pub mod prompt;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{FormalizeService, Formalizer, FormalizerBuilder};
pub use config::{
    FileSettingsStore, ProviderConfig, ProviderKind, SettingField, Settings, SettingsStore,
    StaticSettings,
};
pub use lang::{detect_language, Language};
pub use prompt::build_prompt;
pub use types::{Completion, FormalizeRequest, FormalizeResult, Formalized, ProviderResponse};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
