//! Versioned storage records.
//!
//! Every persisted document carries a version tag checked on read. A record
//! written by an unknown schema version is discarded wholesale; within a
//! recognized conversations document, individually malformed records are
//! dropped one by one rather than failing the load.

use nanochat_core::config::ChatSettings;
use nanochat_core::conversation::Conversation;
use serde::{Deserialize, Serialize};

/// Current storage schema version.
pub const STORAGE_VERSION: u32 = 1;

/// On-disk envelope for the conversation list.
///
/// Conversations are kept as raw JSON values so each record can be decoded
/// (and possibly discarded) independently.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredConversations {
    pub v: u32,
    pub conversations: Vec<serde_json::Value>,
}

/// On-disk envelope for the active conversation pointer.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredActiveId {
    pub v: u32,
    pub id: Option<String>,
}

/// On-disk envelope for user settings.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSettings {
    pub v: u32,
    pub settings: ChatSettings,
}

/// Decodes the records of a recognized document, discarding invalid ones.
pub fn decode_conversations(stored: StoredConversations) -> Vec<Conversation> {
    let total = stored.conversations.len();
    let decoded: Vec<Conversation> = stored
        .conversations
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if decoded.len() < total {
        tracing::warn!(
            "discarded {} invalid conversation record(s)",
            total - decoded.len()
        );
    }
    decoded
}

/// Encodes conversations into the versioned envelope.
pub fn encode_conversations(conversations: &[Conversation]) -> StoredConversations {
    StoredConversations {
        v: STORAGE_VERSION,
        conversations: conversations
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanochat_core::conversation::{ModelId, Tool};

    #[test]
    fn test_decode_discards_invalid_records() {
        let good = Conversation::new(Some("keep"), Tool::Chat, ModelId::Auto);
        let stored = StoredConversations {
            v: STORAGE_VERSION,
            conversations: vec![
                serde_json::to_value(&good).unwrap(),
                serde_json::json!({"id": 42, "junk": true}),
            ],
        };

        let decoded = decode_conversations(stored);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].title, "keep");
    }

    #[test]
    fn test_encode_round_trips() {
        let conversation = Conversation::new(Some("round trip"), Tool::Detect, ModelId::Text);
        let encoded = encode_conversations(std::slice::from_ref(&conversation));
        let decoded = decode_conversations(encoded);
        assert_eq!(decoded, vec![conversation]);
    }
}
