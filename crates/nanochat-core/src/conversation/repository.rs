//! Conversation repository trait.
//!
//! Defines the interface for conversation persistence operations.

use super::model::Conversation;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for persisting conversations and the
/// active-conversation pointer.
///
/// This trait decouples the [`ConversationStore`](super::store::ConversationStore)
/// from the concrete storage mechanism (versioned JSON files, a database, a
/// browser key-value store). Implementations are expected to discard
/// unrecognized or invalid records on read rather than failing the whole
/// load.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Loads all stored conversations.
    ///
    /// Ordering is not guaranteed; the store re-sorts after loading.
    async fn load_all(&self) -> Result<Vec<Conversation>>;

    /// Replaces the stored conversation set.
    async fn save_all(&self, conversations: &[Conversation]) -> Result<()>;

    /// Loads the active conversation id, if one is stored.
    async fn load_active_id(&self) -> Result<Option<String>>;

    /// Stores the active conversation id (`None` clears it).
    async fn save_active_id(&self, id: Option<&str>) -> Result<()>;
}
