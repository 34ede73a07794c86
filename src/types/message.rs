//! Conversation turns shared by every provider driver

use serde::{Deserialize, Serialize};

/// One turn of the conversation sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// The single-turn conversation of a primary call.
pub fn primary_conversation(prompt: &str) -> Vec<Message> {
    vec![Message::user(prompt)]
}

/// The primary conversation extended with the first-pass output and a resume instruction.
pub fn continuation_conversation(prompt: &str, first_pass: &str, instruction: &str) -> Vec<Message> {
    vec![
        Message::user(prompt),
        Message::assistant(first_pass),
        Message::user(instruction),
    ]
}
