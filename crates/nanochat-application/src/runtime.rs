//! UI-facing chat runtime.
//!
//! Binds the send orchestrator and the input queue together: submissions
//! made while a turn is in flight are buffered, and the queue is drained
//! strictly on the busy-to-idle edge, once per edge, never by polling.

use crate::orchestrator::SendOrchestrator;
use crate::queue::{InputQueue, QueuedItem};
use futures::StreamExt;
use nanochat_capability::{AvailabilitySnapshot, CapabilityProvider, PromptOptions};
use nanochat_core::config::ChatSettings;
use nanochat_core::conversation::ConversationStore;
use nanochat_core::user::LocalUser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The surface a presentation layer binds to: submit/stop, busy/thinking,
/// and queue management including force-send.
pub struct ChatRuntime {
    store: Arc<ConversationStore>,
    provider: Arc<dyn CapabilityProvider>,
    orchestrator: SendOrchestrator,
    queue: InputQueue,
}

impl ChatRuntime {
    /// Builds a runtime with its dependencies injected.
    pub fn new(
        store: Arc<ConversationStore>,
        provider: Arc<dyn CapabilityProvider>,
        settings: ChatSettings,
        user: Option<LocalUser>,
    ) -> Self {
        let orchestrator = SendOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&provider),
            settings,
            user,
        );
        Self {
            store,
            provider,
            orchestrator,
            queue: InputQueue::new(),
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn orchestrator(&self) -> &SendOrchestrator {
        &self.orchestrator
    }

    pub fn queue(&self) -> &InputQueue {
        &self.queue
    }

    pub fn busy(&self) -> bool {
        self.orchestrator.busy()
    }

    pub fn thinking(&self) -> bool {
        self.orchestrator.thinking()
    }

    /// Submits user input: dispatched immediately when idle, queued when a
    /// turn is in flight. Empty input is dropped.
    pub async fn submit(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.orchestrator.busy() {
            self.queue.enqueue(trimmed);
            return;
        }
        self.orchestrator.send(trimmed).await;
        self.drain().await;
    }

    /// Stops the in-flight turn, if any.
    pub fn stop(&self) {
        self.orchestrator.stop();
    }

    /// Dispatches a specific queued item ahead of the rest.
    ///
    /// Refused while streamed content is already flowing (`thinking`). When
    /// a turn is otherwise in flight, the item is marked as the forced
    /// target and the turn is stopped; the drain that follows the turn's
    /// completion dispatches it. When idle, it is dispatched immediately.
    pub async fn force_send(&self, id: Uuid) {
        if self.orchestrator.thinking() {
            return;
        }
        if self.orchestrator.busy() {
            self.queue.set_forced(id);
            self.orchestrator.stop();
            return;
        }
        let Some(item) = self.queue.remove(id) else {
            return;
        };
        self.orchestrator.send(&item.text).await;
        self.drain().await;
    }

    /// Convenience snapshot of all capability availabilities.
    pub async fn availability(&self) -> AvailabilitySnapshot {
        AvailabilitySnapshot::collect(self.provider.as_ref()).await
    }

    /// Best-effort model warm-up: creating a session and issuing a throwaway
    /// prompt nudges the host into downloading the on-device model. Errors
    /// are logged and swallowed.
    pub async fn warm_up(&self) {
        let session = match self
            .provider
            .create_prompt_session(PromptOptions {
                system_prompt: Some("Initialize model.".to_string()),
                temperature: Some(0.7),
                top_k: Some(1),
            })
            .await
        {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!("warm-up session creation failed: {e}");
                return;
            }
        };
        match session
            .prompt_streaming("warm up", CancellationToken::new())
            .await
        {
            Ok(mut stream) => while let Some(Ok(_)) = stream.next().await {},
            Err(e) => tracing::debug!("warm-up prompt failed: {e}"),
        }
    }

    /// Current settings.
    pub async fn settings(&self) -> ChatSettings {
        self.orchestrator.settings().await
    }

    /// Updates settings (normalized before use).
    pub async fn update_settings<F>(&self, f: F) -> ChatSettings
    where
        F: FnOnce(&mut ChatSettings),
    {
        self.orchestrator.update_settings(f).await
    }

    /// Snapshot of the queued items.
    pub fn queued_items(&self) -> Vec<QueuedItem> {
        self.queue.items()
    }

    /// Drains the queue after a busy-to-idle edge. The forced target (when
    /// marked) goes first; otherwise strict FIFO. Each completed dispatch is
    /// itself an edge, so the loop continues until the queue is empty or a
    /// turn is left in flight.
    async fn drain(&self) {
        while !self.orchestrator.busy() {
            let Some(item) = self.queue.take_next() else {
                break;
            };
            self.orchestrator.send(&item.text).await;
        }
    }
}
