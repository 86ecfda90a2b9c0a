//! Conversation domain model.
//!
//! A conversation pairs a transcript with the tool and model the user
//! selected for it. `last_updated_at` is stamped on every mutation and is
//! the sole sort key (descending) for conversation listings.

use super::message::ChatMessage;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Title given to conversations that have not been named yet.
pub const DEFAULT_TITLE: &str = "New chat";

/// Fallback title when a rename would produce an empty string.
pub const UNTITLED: &str = "Untitled";

/// The on-device capability a conversation dispatches to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tool {
    Chat,
    Summarize,
    Translate,
    Detect,
    Write,
    Rewrite,
    Proofread,
}

/// Identifier of the model family backing a conversation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelId {
    /// Let the host pick; every tool is permitted.
    #[default]
    Auto,
    /// Text-task expert models (summarize, translate, and friends).
    Text,
    /// The generic prompt model; conversational chat only.
    Generic,
}

impl ModelId {
    /// The tools this model is permitted to serve.
    pub fn capabilities(&self) -> &'static [Tool] {
        match self {
            ModelId::Auto => &[
                Tool::Chat,
                Tool::Summarize,
                Tool::Translate,
                Tool::Detect,
                Tool::Write,
                Tool::Rewrite,
                Tool::Proofread,
            ],
            ModelId::Text => &[
                Tool::Summarize,
                Tool::Translate,
                Tool::Detect,
                Tool::Write,
                Tool::Rewrite,
                Tool::Proofread,
            ],
            ModelId::Generic => &[Tool::Chat],
        }
    }

    /// Whether the given tool is permitted under this model.
    pub fn allows(&self, tool: Tool) -> bool {
        self.capabilities().contains(&tool)
    }
}

/// A conversation: transcript plus tool/model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation identifier (UUID format).
    pub id: String,
    /// Human-readable title, defaults to [`DEFAULT_TITLE`].
    pub title: String,
    /// Creation timestamp, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Last mutation timestamp, milliseconds since the Unix epoch.
    pub last_updated_at: i64,
    /// The model family selected for this conversation.
    pub model: ModelId,
    /// The tool the send flow dispatches to.
    pub tool: Tool,
    /// The transcript, in chronological order.
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates a new conversation with the given selection.
    ///
    /// A blank `title` falls back to [`DEFAULT_TITLE`].
    pub fn new(title: Option<&str>, tool: Tool, model: ModelId) -> Self {
        let now = now_millis();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: now,
            last_updated_at: now,
            model,
            tool,
            messages: Vec::new(),
        }
    }

    /// Finds a message by id.
    pub fn message(&self, message_id: &str) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    /// True when the transcript holds no messages yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_conversation_defaults() {
        let conversation = Conversation::new(None, Tool::Chat, ModelId::Auto);
        assert_eq!(conversation.title, DEFAULT_TITLE);
        assert_eq!(conversation.created_at, conversation.last_updated_at);
        assert!(conversation.is_empty());
    }

    #[test]
    fn test_new_conversation_blank_title_falls_back() {
        let conversation = Conversation::new(Some("   "), Tool::Summarize, ModelId::Text);
        assert_eq!(conversation.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_model_capabilities() {
        assert!(ModelId::Auto.allows(Tool::Chat));
        assert!(ModelId::Auto.allows(Tool::Proofread));
        assert!(ModelId::Text.allows(Tool::Translate));
        assert!(!ModelId::Text.allows(Tool::Chat));
        assert!(ModelId::Generic.allows(Tool::Chat));
        assert!(!ModelId::Generic.allows(Tool::Detect));
    }

    #[test]
    fn test_tool_wire_names() {
        assert_eq!(Tool::Proofread.to_string(), "proofread");
        assert_eq!(
            serde_json::to_string(&Tool::Summarize).unwrap(),
            "\"summarize\""
        );
        assert_eq!(serde_json::to_string(&ModelId::Auto).unwrap(), "\"auto\"");
    }
}
