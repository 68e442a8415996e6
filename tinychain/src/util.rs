//! Small convenience constructors for common types.

use crate::{ChatMessage, ProviderId};

pub fn system_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::system(content)
}

pub fn user_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::user(content)
}

pub fn assistant_message(content: impl Into<String>) -> ChatMessage {
    ChatMessage::assistant(content)
}

/// Lenient parse; unknown names yield `None` instead of an error.
pub fn parse_provider_id(value: &str) -> Option<ProviderId> {
    value.parse().ok()
}
