//! Capability error taxonomy.

use nanochat_core::conversation::Tool;
use thiserror::Error;

/// Errors raised by a capability provider or one of its sessions.
///
/// Cancellation has its own identity so the send flow can distinguish a
/// user-initiated stop (clean termination, partial output kept) from a real
/// failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    /// The capability is not installed or not permitted on this host.
    #[error("Capability unavailable: {tool}")]
    Unavailable { tool: Tool },

    /// The operation was aborted via its cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Any other provider-side failure (malformed output, session death).
    #[error("Capability provider error: {0}")]
    Provider(String),
}

impl CapabilityError {
    /// Creates an Unavailable error for the given tool.
    pub fn unavailable(tool: Tool) -> Self {
        Self::Unavailable { tool }
    }

    /// Creates a Provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// True when this error represents a user-initiated cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// A type alias for `Result<T, CapabilityError>`.
pub type Result<T> = std::result::Result<T, CapabilityError>;
