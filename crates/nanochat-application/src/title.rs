//! Best-effort conversation title generation.
//!
//! Derives a short headline from a conversation's first user message via the
//! summarization capability. The whole feature is fire-and-forget: it never
//! blocks the send flow and never surfaces an error.

use anyhow::Result;
use nanochat_capability::{CapabilityProvider, SummarizerOptions};
use nanochat_core::conversation::{ConversationStore, Tool, DEFAULT_TITLE, UNTITLED};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Maximum length of a generated title, in characters.
const MAX_TITLE_CHARS: usize = 60;

/// Generates conversation titles from first messages.
#[derive(Clone)]
pub struct TitleService {
    store: Arc<ConversationStore>,
    provider: Arc<dyn CapabilityProvider>,
    /// Conversation ids with a generation attempt in flight. Prevents
    /// duplicate concurrent requests for the same conversation.
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl TitleService {
    pub fn new(store: Arc<ConversationStore>, provider: Arc<dyn CapabilityProvider>) -> Self {
        Self {
            store,
            provider,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Kicks off title generation on a background task.
    ///
    /// `fallback_title` is the synchronous truncated title applied at send
    /// time; the generated headline only replaces a title that still equals
    /// the default or that fallback when the result arrives, so a manual
    /// rename in the interim wins.
    pub fn spawn_generate(&self, conversation_id: &str, first_message: &str, fallback_title: &str) {
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            if !in_flight.insert(conversation_id.to_string()) {
                return;
            }
        }

        let service = self.clone();
        let conversation_id = conversation_id.to_string();
        let first_message = first_message.to_string();
        let fallback_title = fallback_title.to_string();
        tokio::spawn(async move {
            if let Err(e) = service
                .generate(&conversation_id, &first_message, &fallback_title)
                .await
            {
                tracing::debug!("title generation skipped: {e:#}");
            }
            service.in_flight.lock().unwrap().remove(&conversation_id);
        });
    }

    async fn generate(
        &self,
        conversation_id: &str,
        first_message: &str,
        fallback_title: &str,
    ) -> Result<()> {
        if !self
            .provider
            .availability(Tool::Summarize)
            .await
            .is_available()
        {
            return Ok(());
        }

        let summarizer = self
            .provider
            .create_summarizer(SummarizerOptions::headline())
            .await?;
        let headline = summarizer.summarize(first_message).await?;
        let title = sanitize_headline(&headline);

        // Double-check against a manual rename that happened while the
        // summarizer was running.
        if let Some(conversation) = self.store.get(conversation_id).await {
            if conversation.title == DEFAULT_TITLE || conversation.title == fallback_title {
                self.store
                    .rename_conversation(conversation_id, &title)
                    .await?;
            }
        }
        Ok(())
    }
}

/// Normalizes a raw headline: newlines collapsed, surrounding quotes
/// stripped, trimmed, capped at [`MAX_TITLE_CHARS`], empty falls back to
/// [`UNTITLED`].
pub(crate) fn sanitize_headline(raw: &str) -> String {
    let collapsed = raw.replace(['\r', '\n'], " ");
    let stripped = collapsed
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}' | '\u{2018}' | '\u{2019}'))
        .trim();
    let capped: String = stripped.chars().take(MAX_TITLE_CHARS).collect();
    let capped = capped.trim_end().to_string();
    if capped.is_empty() {
        UNTITLED.to_string()
    } else {
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_quotes_and_newlines() {
        assert_eq!(sanitize_headline("\"Baking Bread\"\n"), "Baking Bread");
        assert_eq!(sanitize_headline("'one\ntwo'"), "one two");
        assert_eq!(
            sanitize_headline("\u{201c}Curly quotes\u{201d}"),
            "Curly quotes"
        );
    }

    #[test]
    fn test_sanitize_caps_at_sixty_chars() {
        let long = "x".repeat(100);
        assert_eq!(sanitize_headline(&long).chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_headline("  \"\"  "), UNTITLED);
        assert_eq!(sanitize_headline(""), UNTITLED);
    }
}
