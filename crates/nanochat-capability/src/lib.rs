//! Capability provider boundary for on-device text AI.
//!
//! This crate defines the contract between the chat engine and a host's
//! built-in AI capabilities: availability reporting, per-tool session
//! creation, streaming, and the error taxonomy (including the distinct
//! cancellation identity the send flow relies on).

mod availability;
mod error;
mod options;
mod provider;

pub use availability::Availability;
pub use error::{CapabilityError, Result};
pub use options::{
    DetectorOptions, PromptOptions, ProofreaderOptions, RewriteStyle, RewriterOptions,
    SummarizerOptions, SummaryFormat, SummaryKind, SummaryLength, TranslatorOptions, WriterOptions,
    WriterTask, AUTO_SOURCE,
};
pub use provider::{
    AvailabilitySnapshot, CapabilityProvider, ChunkStream, LanguageDetection, LanguageDetector,
    Proofreader, PromptSession, Rewriter, Summarizer, Translator, Writer,
};
