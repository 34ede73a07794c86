//! 类型系统模块：请求、响应与对话消息。
//!
//! # Types Module
//!
//! Values that cross the boundaries of the crate.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Message`] | One conversation turn sent to a provider |
//! | [`Language`] | Source language of the draft (`en` / `it`) |
//! | [`FormalizeRequest`] | Inbound request from the UI collaborator |
//! | [`FormalizeResult`] | Flattened `{ok, output | error}` answer |
//! | [`ProviderResponse`] | Text and truncation flag of one HTTP call |
//! | [`Formalized`] | Successful dispatcher result with its terminal state |

pub mod message;
pub mod request;

pub use crate::lang::Language;
pub use message::{Message, MessageRole};
pub use request::{Completion, FormalizeRequest, FormalizeResult, Formalized, ProviderResponse};
