//! Per-capability session options.
//!
//! These mirror the creation parameters the host capability APIs accept.
//! The send flow passes fixed values for the single-shot tools; only the
//! prompt options vary with user settings.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Options for creating a prompt (chat) session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptOptions {
    /// System instructions prepended to the session.
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Top-K sampling parameter.
    pub top_k: Option<u32>,
}

/// The kind of summary a summarizer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SummaryKind {
    #[default]
    Tldr,
    KeyPoints,
    Headline,
    Teaser,
}

/// Target length of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    #[default]
    Long,
}

/// Output format of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SummaryFormat {
    #[default]
    PlainText,
    Markdown,
}

/// Options for creating a summarizer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarizerOptions {
    pub kind: SummaryKind,
    pub length: SummaryLength,
    pub format: SummaryFormat,
}

impl SummarizerOptions {
    /// The configuration used for conversation-title headlines.
    pub fn headline() -> Self {
        Self {
            kind: SummaryKind::Headline,
            length: SummaryLength::Short,
            format: SummaryFormat::PlainText,
        }
    }
}

/// Language auto-detection marker for [`TranslatorOptions::source_language`].
pub const AUTO_SOURCE: &str = "auto";

/// Options for creating a translator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorOptions {
    /// Source language tag, or [`AUTO_SOURCE`] to let the host detect it.
    pub source_language: String,
    /// Target language tag.
    pub target_language: String,
}

impl TranslatorOptions {
    /// Auto-detected source to the given target language.
    pub fn auto_to(target_language: impl Into<String>) -> Self {
        Self {
            source_language: AUTO_SOURCE.to_string(),
            target_language: target_language.into(),
        }
    }
}

/// Options for creating a language detector session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorOptions {}

/// Writing task for the writer capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriterTask {
    #[default]
    Compose,
    Reply,
}

/// Options for creating a writer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterOptions {
    pub task: WriterTask,
}

/// Rewrite style for the rewriter capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RewriteStyle {
    #[default]
    Neutral,
    MoreFormal,
    MoreCasual,
}

/// Options for creating a rewriter session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriterOptions {
    pub style: RewriteStyle,
}

/// Options for creating a proofreader session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProofreaderOptions {}
