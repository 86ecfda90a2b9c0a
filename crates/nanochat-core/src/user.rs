//! Local user identity.
//!
//! Conversations and settings are stored per signed-in local user. The
//! sign-in flow itself belongs to the embedding application; the engine only
//! carries the identity for storage scoping and message author metadata.

use serde::{Deserialize, Serialize};

/// A locally signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    /// Stable identifier, used to scope the storage directory.
    pub id: String,
    /// Display name attached to outgoing user messages.
    pub name: String,
    /// Optional avatar URL for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl LocalUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}
