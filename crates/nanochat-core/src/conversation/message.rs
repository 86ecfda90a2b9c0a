//! Chat message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// A single message in a conversation transcript.
///
/// Assistant messages start with empty content and grow as streamed chunks
/// arrive; the transcript order is chronological and never rearranged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier within the conversation.
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Display name of the author, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Avatar URL of the author, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_avatar_url: Option<String>,
}

impl ChatMessage {
    /// Creates a user message with the given content.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::User,
            content: content.into(),
            author_name: None,
            author_avatar_url: None,
        }
    }

    /// Creates an empty assistant message awaiting its first content patch.
    pub fn assistant_placeholder() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: MessageRole::Assistant,
            content: String::new(),
            author_name: None,
            author_avatar_url: None,
        }
    }

    /// True for an assistant message that has not received any content yet.
    ///
    /// Presentation layers key their "assistant is thinking" indicator on
    /// this state.
    pub fn is_pending_assistant(&self) -> bool {
        self.role == MessageRole::Assistant && self.content.is_empty()
    }
}

/// A partial update applied to an existing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    /// Replacement content, if set.
    pub content: Option<String>,
}

impl MessagePatch {
    /// A patch replacing the message content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Applies this patch to a message in place.
    pub fn apply(&self, message: &mut ChatMessage) {
        if let Some(content) = &self.content {
            message.content = content.clone();
        }
    }
}
