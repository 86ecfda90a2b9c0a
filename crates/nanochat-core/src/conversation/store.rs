//! In-memory conversation store with write-through persistence.

use super::message::{ChatMessage, MessagePatch};
use super::model::{now_millis, Conversation, ModelId, Tool, UNTITLED};
use super::repository::ConversationRepository;
use crate::error::{ChatError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Initial selection for a conversation being created.
#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub title: Option<String>,
    pub tool: Option<Tool>,
    pub model: Option<ModelId>,
}

/// Owns the conversation list and the active-conversation pointer.
///
/// All mutations stamp `last_updated_at`, keep the list sorted descending by
/// it, and write through to the injected [`ConversationRepository`].
/// Persistence failures are logged and do not poison the in-memory state;
/// `Err` is reserved for contract violations such as unknown ids.
///
/// Tool/model selections made while no conversation is active are held as
/// pending and inherited by the next created conversation.
pub struct ConversationStore {
    conversations: RwLock<Vec<Conversation>>,
    active_id: RwLock<Option<String>>,
    pending_tool: RwLock<Option<Tool>>,
    pending_model: RwLock<Option<ModelId>>,
    repository: Arc<dyn ConversationRepository>,
}

impl ConversationStore {
    /// Creates an empty store backed by the given repository.
    ///
    /// Call [`hydrate`](Self::hydrate) to load persisted state.
    pub fn new(repository: Arc<dyn ConversationRepository>) -> Self {
        Self {
            conversations: RwLock::new(Vec::new()),
            active_id: RwLock::new(None),
            pending_tool: RwLock::new(None),
            pending_model: RwLock::new(None),
            repository,
        }
    }

    /// Loads conversations and the active pointer from the repository.
    ///
    /// An active id that does not match any loaded conversation is dropped.
    pub async fn hydrate(&self) -> Result<()> {
        let mut loaded = self.repository.load_all().await?;
        loaded.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));

        let active = self
            .repository
            .load_active_id()
            .await?
            .filter(|id| loaded.iter().any(|c| c.id == *id));

        *self.conversations.write().await = loaded;
        *self.active_id.write().await = active;
        Ok(())
    }

    /// Creates a conversation, makes it active and returns it.
    ///
    /// Missing fields inherit the pending tool/model selection, then the
    /// defaults (`chat` / `auto`).
    pub async fn create_conversation(&self, initial: NewConversation) -> Conversation {
        let tool = match initial.tool {
            Some(tool) => tool,
            None => self.pending_tool.read().await.unwrap_or(Tool::Chat),
        };
        let model = match initial.model {
            Some(model) => model,
            None => self.pending_model.read().await.unwrap_or_default(),
        };
        let conversation = Conversation::new(initial.title.as_deref(), tool, model);

        {
            let mut conversations = self.conversations.write().await;
            conversations.insert(0, conversation.clone());
            self.persist(&conversations).await;
        }
        self.set_active_id(Some(conversation.id.clone())).await;

        conversation
    }

    /// Sets (or clears) the active conversation id.
    pub async fn set_active_id(&self, id: Option<String>) {
        *self.active_id.write().await = id.clone();
        if let Err(e) = self.repository.save_active_id(id.as_deref()).await {
            tracing::warn!("failed to persist active conversation id: {e}");
        }
    }

    /// Returns the active conversation id, if any.
    pub async fn active_id(&self) -> Option<String> {
        self.active_id.read().await.clone()
    }

    /// Returns a copy of the active conversation, if any.
    pub async fn get_active(&self) -> Option<Conversation> {
        let active_id = self.active_id.read().await.clone()?;
        self.get(&active_id).await
    }

    /// Returns a copy of the conversation with the given id.
    pub async fn get(&self, id: &str) -> Option<Conversation> {
        self.conversations
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Returns all conversations, most recently updated first.
    pub async fn list(&self) -> Vec<Conversation> {
        self.conversations.read().await.clone()
    }

    /// Renames a conversation. A blank title becomes [`UNTITLED`].
    pub async fn rename_conversation(&self, id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        let title = if title.is_empty() { UNTITLED } else { title };
        self.mutate(id, |conversation| {
            conversation.title = title.to_string();
        })
        .await
    }

    /// Deletes a conversation, clearing the active pointer if it pointed at it.
    pub async fn delete_conversation(&self, id: &str) {
        {
            let mut conversations = self.conversations.write().await;
            conversations.retain(|c| c.id != id);
            self.persist(&conversations).await;
        }
        let was_active = self.active_id.read().await.as_deref() == Some(id);
        if was_active {
            self.set_active_id(None).await;
        }
    }

    /// Appends messages to a conversation in a single mutation.
    ///
    /// The send flow relies on this to make the user message and the
    /// assistant placeholder visible together, before any streaming starts.
    pub async fn append_messages(&self, id: &str, messages: Vec<ChatMessage>) -> Result<()> {
        self.mutate(id, |conversation| {
            conversation.messages.extend(messages);
        })
        .await
    }

    /// Applies a patch to a single message.
    pub async fn update_message(
        &self,
        conversation_id: &str,
        message_id: &str,
        patch: MessagePatch,
    ) -> Result<()> {
        let mut found = false;
        self.mutate(conversation_id, |conversation| {
            if let Some(message) = conversation.messages.iter_mut().find(|m| m.id == message_id) {
                patch.apply(message);
                found = true;
            }
        })
        .await?;
        if !found {
            return Err(ChatError::not_found("message", message_id));
        }
        Ok(())
    }

    /// Changes the active conversation's tool, or records it as pending when
    /// no conversation is active.
    pub async fn set_active_tool(&self, tool: Tool) {
        let active_id = self.active_id.read().await.clone();
        match active_id {
            Some(id) => {
                let _ = self.mutate(&id, |conversation| conversation.tool = tool).await;
            }
            None => *self.pending_tool.write().await = Some(tool),
        }
    }

    /// Changes the active conversation's model, or records it as pending when
    /// no conversation is active.
    pub async fn set_active_model(&self, model: ModelId) {
        let active_id = self.active_id.read().await.clone();
        match active_id {
            Some(id) => {
                let _ = self
                    .mutate(&id, |conversation| conversation.model = model)
                    .await;
            }
            None => *self.pending_model.write().await = Some(model),
        }
    }

    /// Applies `f` to the conversation with the given id, stamps the update
    /// time, re-sorts and persists.
    async fn mutate<F>(&self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Conversation),
    {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ChatError::not_found("conversation", id))?;
        f(conversation);
        conversation.last_updated_at = now_millis();
        conversations.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));
        self.persist(&conversations).await;
        Ok(())
    }

    async fn persist(&self, conversations: &[Conversation]) {
        if let Err(e) = self.repository.save_all(conversations).await {
            tracing::warn!("failed to persist conversations: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::MessageRole;
    use std::sync::Mutex;

    // Mock ConversationRepository for testing
    #[derive(Default)]
    struct MockRepository {
        conversations: Mutex<Vec<Conversation>>,
        active_id: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl ConversationRepository for MockRepository {
        async fn load_all(&self) -> Result<Vec<Conversation>> {
            Ok(self.conversations.lock().unwrap().clone())
        }

        async fn save_all(&self, conversations: &[Conversation]) -> Result<()> {
            *self.conversations.lock().unwrap() = conversations.to_vec();
            Ok(())
        }

        async fn load_active_id(&self) -> Result<Option<String>> {
            Ok(self.active_id.lock().unwrap().clone())
        }

        async fn save_active_id(&self, id: Option<&str>) -> Result<()> {
            *self.active_id.lock().unwrap() = id.map(str::to_string);
            Ok(())
        }
    }

    fn store() -> ConversationStore {
        ConversationStore::new(Arc::new(MockRepository::default()))
    }

    #[tokio::test]
    async fn test_create_conversation_becomes_active() {
        let store = store();
        let conversation = store.create_conversation(NewConversation::default()).await;

        assert_eq!(store.active_id().await, Some(conversation.id.clone()));
        assert_eq!(store.get_active().await.unwrap().id, conversation.id);
        assert_eq!(conversation.tool, Tool::Chat);
        assert_eq!(conversation.model, ModelId::Auto);
    }

    #[tokio::test]
    async fn test_pending_selection_inherited_on_create() {
        let store = store();
        store.set_active_tool(Tool::Translate).await;
        store.set_active_model(ModelId::Text).await;

        let conversation = store.create_conversation(NewConversation::default()).await;
        assert_eq!(conversation.tool, Tool::Translate);
        assert_eq!(conversation.model, ModelId::Text);
    }

    #[tokio::test]
    async fn test_rename_blank_falls_back_to_untitled() {
        let store = store();
        let conversation = store.create_conversation(NewConversation::default()).await;

        store
            .rename_conversation(&conversation.id, "  ")
            .await
            .unwrap();
        assert_eq!(store.get(&conversation.id).await.unwrap().title, UNTITLED);
    }

    #[tokio::test]
    async fn test_append_and_patch_messages() {
        let store = store();
        let conversation = store.create_conversation(NewConversation::default()).await;

        let user = ChatMessage::user("hello");
        let assistant = ChatMessage::assistant_placeholder();
        let assistant_id = assistant.id.clone();
        store
            .append_messages(&conversation.id, vec![user, assistant])
            .await
            .unwrap();

        let loaded = store.get(&conversation.id).await.unwrap();
        assert_eq!(loaded.messages.len(), 2);
        assert_eq!(loaded.messages[0].role, MessageRole::User);
        assert!(loaded.messages[1].is_pending_assistant());

        store
            .update_message(&conversation.id, &assistant_id, MessagePatch::content("hi"))
            .await
            .unwrap();
        let loaded = store.get(&conversation.id).await.unwrap();
        assert_eq!(loaded.messages[1].content, "hi");
        assert!(!loaded.messages[1].is_pending_assistant());
    }

    #[tokio::test]
    async fn test_update_unknown_message_is_not_found() {
        let store = store();
        let conversation = store.create_conversation(NewConversation::default()).await;

        let err = store
            .update_message(&conversation.id, "missing", MessagePatch::content("x"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_sorted_by_last_update() {
        let store = store();
        let first = store.create_conversation(NewConversation::default()).await;
        let _second = store.create_conversation(NewConversation::default()).await;

        // Touching the first conversation moves it back to the front.
        store
            .append_messages(&first.id, vec![ChatMessage::user("bump")])
            .await
            .unwrap();

        let list = store.list().await;
        assert_eq!(list[0].id, first.id);
    }

    #[tokio::test]
    async fn test_delete_active_clears_pointer() {
        let store = store();
        let conversation = store.create_conversation(NewConversation::default()).await;

        store.delete_conversation(&conversation.id).await;
        assert_eq!(store.active_id().await, None);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_drops_stale_active_id() {
        let repository = Arc::new(MockRepository::default());
        *repository.active_id.lock().unwrap() = Some("gone".to_string());

        let store = ConversationStore::new(repository);
        store.hydrate().await.unwrap();
        assert_eq!(store.active_id().await, None);
    }
}
