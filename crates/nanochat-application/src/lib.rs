//! Application layer for nanochat.
//!
//! This crate implements the send/stream orchestration on top of the domain
//! and capability layers: the send orchestrator, the input queue, the
//! UI-facing runtime, and best-effort title generation.

pub mod orchestrator;
pub mod queue;
pub mod runtime;
pub mod title;

pub use orchestrator::{ErrorHook, SendOrchestrator};
pub use queue::{InputQueue, QueuedItem};
pub use runtime::ChatRuntime;
pub use title::TitleService;
