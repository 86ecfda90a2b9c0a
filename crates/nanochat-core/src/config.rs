//! Chat settings.
//!
//! User-tunable parameters for the prompt capability and the send flow.
//! Settings are persisted by the infrastructure layer; [`ChatSettings::normalized`]
//! is applied on every load and save so out-of-range values never reach the
//! capability provider.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default system prompt for chat sessions.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise assistant.";

/// Default translation target language (BCP 47 tag).
pub const DEFAULT_TARGET_LANG: &str = "en";

/// User-facing settings for the chat engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// System instructions passed to new prompt sessions.
    pub system_prompt: String,
    /// Sampling temperature for prompt sessions.
    pub temperature: f64,
    /// Top-K sampling parameter for prompt sessions.
    pub top_k: u32,
    /// Whether chat responses are patched into the transcript chunk by chunk.
    pub stream: bool,
    /// Target language for the translate tool.
    pub target_lang: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.7,
            top_k: 1,
            stream: true,
            target_lang: DEFAULT_TARGET_LANG.to_string(),
        }
    }
}

impl ChatSettings {
    /// Returns a copy with every field forced into its valid range.
    ///
    /// Empty strings fall back to the defaults, temperature is clamped to
    /// [0.0, 2.0] and top-K to [1, 40].
    pub fn normalized(mut self) -> Self {
        if self.system_prompt.trim().is_empty() {
            self.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
        }
        if !self.temperature.is_finite() {
            self.temperature = Self::default().temperature;
        }
        self.temperature = self.temperature.clamp(0.0, 2.0);
        self.top_k = self.top_k.clamp(1, 40);
        if self.target_lang.trim().is_empty() {
            self.target_lang = DEFAULT_TARGET_LANG.to_string();
        }
        self
    }
}

/// An abstract repository for persisting chat settings.
///
/// Implementations are expected to return defaults when no valid record
/// exists rather than failing the load.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the stored settings, falling back to defaults for missing or
    /// invalid records.
    async fn load(&self) -> Result<ChatSettings>;

    /// Saves the settings.
    async fn save(&self, settings: &ChatSettings) -> Result<()>;
}
