//! The capability provider boundary.
//!
//! A host environment (a browser's built-in AI surface, a native runtime)
//! exposes seven independently-available text capabilities. Each concrete
//! host API version implements [`CapabilityProvider`] once; the rest of the
//! engine only ever talks to these traits.

use crate::availability::Availability;
use crate::error::Result;
use crate::options::{
    DetectorOptions, PromptOptions, ProofreaderOptions, RewriterOptions, SummarizerOptions,
    TranslatorOptions, WriterOptions,
};
use async_trait::async_trait;
use futures::stream::BoxStream;
use nanochat_core::conversation::Tool;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// A lazy, finite, non-restartable sequence of streamed text chunks.
///
/// Chunks are **incremental deltas**: each item is new text to append to the
/// running response, never a cumulative replacement. Consumers accumulate
/// their own total so the final text is identical whether or not every
/// intermediate chunk was surfaced.
pub type ChunkStream = BoxStream<'static, Result<String>>;

/// A prompt (chat) session.
#[async_trait]
pub trait PromptSession: Send + Sync {
    /// Streams the model's response to `input`.
    ///
    /// The session observes `cancel` cooperatively: after the token is
    /// cancelled the stream yields [`CapabilityError::Cancelled`]
    /// (or simply ends) instead of further chunks.
    ///
    /// [`CapabilityError::Cancelled`]: crate::error::CapabilityError::Cancelled
    async fn prompt_streaming(&self, input: &str, cancel: CancellationToken)
        -> Result<ChunkStream>;
}

/// A single-shot summarizer session.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// A single-shot translator session.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String>;
}

/// The structured result of a language detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    /// Detected language tag (e.g. `"fr"`).
    pub language: String,
    /// Detection confidence in [0, 1].
    pub confidence: f64,
}

/// A single-shot language detector session.
///
/// This is the one capability whose result is structured data rather than
/// prose; callers render it as they see fit.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    async fn detect(&self, text: &str) -> Result<LanguageDetection>;
}

/// A single-shot writer session.
#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(&self, text: &str) -> Result<String>;
}

/// A single-shot rewriter session.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String>;
}

/// A single-shot proofreader session.
#[async_trait]
pub trait Proofreader: Send + Sync {
    async fn proofread(&self, text: &str) -> Result<String>;
}

/// Access to the host's on-device text capabilities.
///
/// Creation calls may themselves suspend for a long time (model load or
/// download). Implementations report [`Availability::Unavailable`] rather
/// than erroring from `availability` when a capability is missing entirely.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Reports the availability of the given tool's capability.
    async fn availability(&self, tool: Tool) -> Availability;

    /// Creates a prompt session.
    async fn create_prompt_session(&self, options: PromptOptions)
        -> Result<Box<dyn PromptSession>>;

    /// Creates a summarizer session.
    async fn create_summarizer(&self, options: SummarizerOptions) -> Result<Box<dyn Summarizer>>;

    /// Creates a translator session.
    async fn create_translator(&self, options: TranslatorOptions) -> Result<Box<dyn Translator>>;

    /// Creates a language detector session.
    async fn create_detector(&self, options: DetectorOptions) -> Result<Box<dyn LanguageDetector>>;

    /// Creates a writer session.
    async fn create_writer(&self, options: WriterOptions) -> Result<Box<dyn Writer>>;

    /// Creates a rewriter session.
    async fn create_rewriter(&self, options: RewriterOptions) -> Result<Box<dyn Rewriter>>;

    /// Creates a proofreader session.
    async fn create_proofreader(
        &self,
        options: ProofreaderOptions,
    ) -> Result<Box<dyn Proofreader>>;
}

/// A point-in-time view of every capability's availability.
///
/// Presentation layers poll this in one sweep to drive status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub chat: Availability,
    pub summarize: Availability,
    pub translate: Availability,
    pub detect: Availability,
    pub write: Availability,
    pub rewrite: Availability,
    pub proofread: Availability,
}

impl AvailabilitySnapshot {
    /// Queries the provider for all seven tools.
    pub async fn collect(provider: &dyn CapabilityProvider) -> Self {
        Self {
            chat: provider.availability(Tool::Chat).await,
            summarize: provider.availability(Tool::Summarize).await,
            translate: provider.availability(Tool::Translate).await,
            detect: provider.availability(Tool::Detect).await,
            write: provider.availability(Tool::Write).await,
            rewrite: provider.availability(Tool::Rewrite).await,
            proofread: provider.availability(Tool::Proofread).await,
        }
    }

    /// The availability recorded for the given tool.
    pub fn get(&self, tool: Tool) -> Availability {
        match tool {
            Tool::Chat => self.chat,
            Tool::Summarize => self.summarize,
            Tool::Translate => self.translate,
            Tool::Detect => self.detect,
            Tool::Write => self.write,
            Tool::Rewrite => self.rewrite,
            Tool::Proofread => self.proofread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_detection_serializes_in_field_order() {
        let detection = LanguageDetection {
            language: "fr".to_string(),
            confidence: 0.98,
        };
        let json = serde_json::to_string_pretty(&detection).unwrap();
        assert_eq!(json, "{\n  \"language\": \"fr\",\n  \"confidence\": 0.98\n}");
    }
}
