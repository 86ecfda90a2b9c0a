//! JSON-file ConversationRepository implementation.

use crate::dto::{
    decode_conversations, encode_conversations, StoredActiveId, StoredConversations,
    STORAGE_VERSION,
};
use crate::paths::StoragePaths;
use async_trait::async_trait;
use nanochat_core::conversation::{Conversation, ConversationRepository};
use nanochat_core::error::Result;
use std::fs;
use std::path::Path;

/// Stores the conversation list and the active pointer as versioned JSON
/// documents under the signed-in user's storage directory.
///
/// Reads are tolerant: a missing file, an unrecognized schema version or a
/// malformed document all yield the empty state, and individually invalid
/// conversation records are discarded (the app must never crash over bad
/// stored data).
pub struct JsonConversationRepository {
    paths: StoragePaths,
    user_id: String,
}

impl JsonConversationRepository {
    /// Creates a repository rooted at `base_dir`, scoped to the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>, user_id: impl Into<String>) -> Result<Self> {
        let paths = StoragePaths::new(base_dir);
        let user_id = user_id.into();
        fs::create_dir_all(paths.user_dir(&user_id))?;
        Ok(Self { paths, user_id })
    }

    /// Creates a repository at the default location (`~/.nanochat`).
    pub fn default_location(user_id: impl Into<String>) -> Result<Self> {
        let paths = StoragePaths::default_location()?;
        let user_id = user_id.into();
        fs::create_dir_all(paths.user_dir(&user_id))?;
        Ok(Self { paths, user_id })
    }
}

#[async_trait]
impl ConversationRepository for JsonConversationRepository {
    async fn load_all(&self) -> Result<Vec<Conversation>> {
        let file = self.paths.conversations_file(&self.user_id);
        if !file.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&file)?;
        let stored: StoredConversations = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("discarding unreadable conversations document: {e}");
                return Ok(Vec::new());
            }
        };
        if stored.v != STORAGE_VERSION {
            tracing::warn!(
                "discarding conversations document with unknown version {}",
                stored.v
            );
            return Ok(Vec::new());
        }
        Ok(decode_conversations(stored))
    }

    async fn save_all(&self, conversations: &[Conversation]) -> Result<()> {
        let file = self.paths.conversations_file(&self.user_id);
        let stored = encode_conversations(conversations);
        fs::write(&file, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }

    async fn load_active_id(&self) -> Result<Option<String>> {
        let file = self.paths.active_file(&self.user_id);
        if !file.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&file)?;
        match serde_json::from_str::<StoredActiveId>(&raw) {
            Ok(stored) if stored.v == STORAGE_VERSION => Ok(stored.id),
            _ => Ok(None),
        }
    }

    async fn save_active_id(&self, id: Option<&str>) -> Result<()> {
        let file = self.paths.active_file(&self.user_id);
        let stored = StoredActiveId {
            v: STORAGE_VERSION,
            id: id.map(str::to_string),
        };
        fs::write(&file, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}
