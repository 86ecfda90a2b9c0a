//! Conversation domain module.
//!
//! This module contains the conversation domain models, the repository
//! interface, and the store that owns conversation state.
//!
//! # Module Structure
//!
//! - `model`: Core conversation domain model (`Conversation`, `Tool`, `ModelId`)
//! - `message`: Transcript message types (`MessageRole`, `ChatMessage`, `MessagePatch`)
//! - `repository`: Repository trait for conversation persistence
//! - `store`: Conversation state ownership and mutation primitives

mod message;
mod model;
mod repository;
mod store;

pub use message::{ChatMessage, MessagePatch, MessageRole};
pub use model::{now_millis, Conversation, ModelId, Tool, DEFAULT_TITLE, UNTITLED};
pub use repository::ConversationRepository;
pub use store::{ConversationStore, NewConversation};
