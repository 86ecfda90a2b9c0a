//! Send orchestration: one user turn against the selected tool.
//!
//! The orchestrator enforces at-most-one-concurrent-turn semantics. A turn
//! appends the user message and an empty assistant placeholder together,
//! dispatches to the capability matching the conversation's tool, and
//! reconciles streamed or single-shot output into the placeholder. `send`
//! never propagates capability-level failures to the caller: cancellation is
//! swallowed silently with partial content kept, everything else is logged
//! (and forwarded to the error hook) with partial content kept.

use crate::title::TitleService;
use anyhow::{anyhow, bail, Result};
use futures::StreamExt;
use nanochat_capability::{
    CapabilityError, CapabilityProvider, DetectorOptions, PromptOptions, ProofreaderOptions,
    RewriterOptions, SummarizerOptions, TranslatorOptions, WriterOptions,
};
use nanochat_core::config::ChatSettings;
use nanochat_core::conversation::{
    ChatMessage, Conversation, ConversationStore, MessagePatch, NewConversation, Tool,
    DEFAULT_TITLE,
};
use nanochat_core::user::LocalUser;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Maximum length of the synchronous fallback title, in characters.
const FALLBACK_TITLE_CHARS: usize = 20;

/// Callback invoked with a human-readable message when a turn fails.
/// Lets a presentation layer surface failures without the core hard-coding
/// anything beyond logging.
pub type ErrorHook = Arc<dyn Fn(String) + Send + Sync>;

/// Executes user turns against the capability provider, one at a time.
///
/// Constructed with its dependencies injected; there is no global instance.
pub struct SendOrchestrator {
    store: Arc<ConversationStore>,
    provider: Arc<dyn CapabilityProvider>,
    settings: RwLock<ChatSettings>,
    user: Option<LocalUser>,
    titles: TitleService,
    /// The sole mutual-exclusion mechanism: set before the first suspension
    /// point of a turn, cleared in the turn's final cleanup.
    busy: AtomicBool,
    /// True once a streaming turn's content has started flowing.
    thinking: AtomicBool,
    /// Monotonic turn counter; a stale turn's cleanup must not clobber the
    /// state of a turn started after `stop()`.
    generation: AtomicU64,
    cancel: Mutex<Option<CancellationToken>>,
    error_hook: Mutex<Option<ErrorHook>>,
}

impl SendOrchestrator {
    pub fn new(
        store: Arc<ConversationStore>,
        provider: Arc<dyn CapabilityProvider>,
        settings: ChatSettings,
        user: Option<LocalUser>,
    ) -> Self {
        let titles = TitleService::new(Arc::clone(&store), Arc::clone(&provider));
        Self {
            store,
            provider,
            settings: RwLock::new(settings.normalized()),
            user,
            titles,
            busy: AtomicBool::new(false),
            thinking: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            cancel: Mutex::new(None),
            error_hook: Mutex::new(None),
        }
    }

    /// Registers a callback invoked when a turn fails for a reason other
    /// than cancellation.
    pub fn set_error_hook(&self, hook: ErrorHook) {
        *self.error_hook.lock().unwrap() = Some(hook);
    }

    /// Whether a turn is currently in flight.
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether an in-flight turn's streamed content has started flowing.
    ///
    /// Force-send uses this as its refusal condition; the UI's "assistant is
    /// thinking" indicator is derived from the empty placeholder instead.
    pub fn thinking(&self) -> bool {
        self.thinking.load(Ordering::SeqCst)
    }

    /// A copy of the current settings.
    pub async fn settings(&self) -> ChatSettings {
        self.settings.read().await.clone()
    }

    /// Mutates the settings; the result is normalized before use.
    pub async fn update_settings<F>(&self, f: F) -> ChatSettings
    where
        F: FnOnce(&mut ChatSettings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
        *settings = settings.clone().normalized();
        settings.clone()
    }

    /// Executes one user turn.
    ///
    /// Empty input is a no-op. A call while a turn is in flight is refused,
    /// not queued; buffering is the caller's responsibility. This method
    /// never returns an error: all dispatch failures are handled here.
    pub async fn send(&self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        // One turn at a time. The flag is taken before any suspension point.
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap() = Some(cancel.clone());

        match self.run_turn(trimmed, cancel).await {
            Ok(()) => {}
            Err(e) if is_cancellation(&e) => {
                // Clean termination: partial content stays exactly as it was.
                tracing::debug!("turn cancelled");
            }
            Err(e) => {
                tracing::error!("send failed: {e:#}");
                let hook = self.error_hook.lock().unwrap().clone();
                if let Some(hook) = hook {
                    hook(format!("{e:#}"));
                }
            }
        }

        self.finish_turn(generation);
    }

    /// Signals cancellation of the in-flight turn, if any.
    ///
    /// Idempotent and infallible. The machine reads as idle immediately; the
    /// in-flight work observes the token at its next suspension point and
    /// stops producing patches.
    pub fn stop(&self) {
        let token = self.cancel.lock().unwrap().take();
        if let Some(token) = token {
            token.cancel();
        }
        self.busy.store(false, Ordering::SeqCst);
        self.thinking.store(false, Ordering::SeqCst);
    }

    async fn run_turn(&self, trimmed: &str, cancel: CancellationToken) -> Result<()> {
        let active_id = match self.store.active_id().await {
            Some(id) => id,
            None => {
                self.store
                    .create_conversation(NewConversation::default())
                    .await
                    .id
            }
        };
        // Re-resolve the authoritative copy; the store may have changed
        // while the conversation was being created.
        let conversation = self
            .store
            .get(&active_id)
            .await
            .ok_or_else(|| anyhow!("active conversation disappeared: {active_id}"))?;

        let user_message = self.user_message(trimmed);
        let assistant = ChatMessage::assistant_placeholder();
        let assistant_id = assistant.id.clone();

        let was_empty = conversation.is_empty();
        let pre_title = conversation.title.clone();

        // Both messages land in one mutation so the placeholder is visible
        // before any streaming starts.
        self.store
            .append_messages(&conversation.id, vec![user_message, assistant])
            .await?;

        if was_empty {
            let fallback = fallback_title(trimmed);
            if pre_title == DEFAULT_TITLE {
                if let Err(e) = self
                    .store
                    .rename_conversation(&conversation.id, &fallback)
                    .await
                {
                    tracing::warn!("fallback rename failed: {e}");
                }
            }
            self.titles
                .spawn_generate(&conversation.id, trimmed, &fallback);
        }

        self.dispatch(&conversation, trimmed, &assistant_id, cancel)
            .await
    }

    async fn dispatch(
        &self,
        conversation: &Conversation,
        input: &str,
        assistant_id: &str,
        cancel: CancellationToken,
    ) -> Result<()> {
        let tool = conversation.tool;
        if !conversation.model.allows(tool) {
            bail!(
                "tool '{tool}' is not permitted under model '{}'",
                conversation.model
            );
        }

        let settings = self.settings.read().await.clone();
        match tool {
            Tool::Chat => {
                self.dispatch_chat(conversation, input, assistant_id, &settings, cancel)
                    .await
            }
            Tool::Summarize => {
                let summarizer = self
                    .provider
                    .create_summarizer(SummarizerOptions::default())
                    .await?;
                let output = summarizer.summarize(input).await?;
                self.finish_single_shot(conversation, assistant_id, output, &cancel)
                    .await
            }
            Tool::Translate => {
                let translator = self
                    .provider
                    .create_translator(TranslatorOptions::auto_to(&settings.target_lang))
                    .await?;
                let output = translator.translate(input).await?;
                self.finish_single_shot(conversation, assistant_id, output, &cancel)
                    .await
            }
            Tool::Detect => {
                let detector = self
                    .provider
                    .create_detector(DetectorOptions::default())
                    .await?;
                let detection = detector.detect(input).await?;
                let rendered = serde_json::to_string_pretty(&detection)?;
                self.finish_single_shot(conversation, assistant_id, rendered, &cancel)
                    .await
            }
            Tool::Write => {
                let writer = self.provider.create_writer(WriterOptions::default()).await?;
                let output = writer.write(input).await?;
                self.finish_single_shot(conversation, assistant_id, output, &cancel)
                    .await
            }
            Tool::Rewrite => {
                let rewriter = self
                    .provider
                    .create_rewriter(RewriterOptions::default())
                    .await?;
                let output = rewriter.rewrite(input).await?;
                self.finish_single_shot(conversation, assistant_id, output, &cancel)
                    .await
            }
            Tool::Proofread => {
                let proofreader = self
                    .provider
                    .create_proofreader(ProofreaderOptions::default())
                    .await?;
                let output = proofreader.proofread(input).await?;
                self.finish_single_shot(conversation, assistant_id, output, &cancel)
                    .await
            }
        }
    }

    async fn dispatch_chat(
        &self,
        conversation: &Conversation,
        input: &str,
        assistant_id: &str,
        settings: &ChatSettings,
        cancel: CancellationToken,
    ) -> Result<()> {
        let session = self
            .provider
            .create_prompt_session(PromptOptions {
                system_prompt: Some(settings.system_prompt.clone()),
                temperature: Some(settings.temperature),
                top_k: Some(settings.top_k),
            })
            .await?;

        let mut stream = session.prompt_streaming(input, cancel.clone()).await?;

        // Chunks are incremental deltas; the running total is ours to keep,
        // and every patch replaces the whole content with it.
        let mut accumulated = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if cancel.is_cancelled() {
                return Err(CapabilityError::Cancelled.into());
            }
            accumulated.push_str(&chunk);
            if settings.stream {
                self.store
                    .update_message(
                        &conversation.id,
                        assistant_id,
                        MessagePatch::content(accumulated.clone()),
                    )
                    .await?;
                if !accumulated.is_empty() {
                    self.thinking.store(true, Ordering::SeqCst);
                }
            }
        }

        if !settings.stream {
            self.finish_single_shot(conversation, assistant_id, accumulated, &cancel)
                .await?;
        }
        Ok(())
    }

    /// Applies the single terminal content patch, unless the turn was
    /// cancelled while the capability call was running.
    async fn finish_single_shot(
        &self,
        conversation: &Conversation,
        assistant_id: &str,
        content: String,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(CapabilityError::Cancelled.into());
        }
        self.store
            .update_message(&conversation.id, assistant_id, MessagePatch::content(content))
            .await?;
        Ok(())
    }

    /// Final cleanup; runs on every turn outcome. Skipped when a newer turn
    /// has started in the meantime (its own cleanup will run later).
    fn finish_turn(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.busy.store(false, Ordering::SeqCst);
            self.thinking.store(false, Ordering::SeqCst);
            *self.cancel.lock().unwrap() = None;
        }
    }

    fn user_message(&self, content: &str) -> ChatMessage {
        let mut message = ChatMessage::user(content);
        if let Some(user) = &self.user {
            message.author_name = Some(user.name.clone());
            message.author_avatar_url = user.avatar_url.clone();
        }
        message
    }
}

/// True when the error is the distinct cancellation identity raised from an
/// aborted capability call.
fn is_cancellation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<CapabilityError>()
        .is_some_and(CapabilityError::is_cancelled)
}

/// Character-safe truncation of the first user message for the synchronous
/// title fallback.
fn fallback_title(text: &str) -> String {
    text.chars().take(FALLBACK_TITLE_CHARS).collect()
}
