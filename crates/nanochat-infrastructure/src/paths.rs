//! Storage path layout.
//!
//! All persisted state lives under a base directory, scoped per signed-in
//! local user:
//!
//! ```text
//! base_dir/
//! └── users/
//!     └── <user-id>/
//!         ├── conversations.json
//!         ├── active.json
//!         └── settings.json
//! ```

use nanochat_core::error::{ChatError, Result};
use std::path::{Path, PathBuf};

/// Default directory name under the home directory.
const DEFAULT_DIR: &str = ".nanochat";

/// Resolves file locations under the storage base directory.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    base_dir: PathBuf,
}

impl StoragePaths {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// The default location (`~/.nanochat`).
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ChatError::config("failed to determine home directory"))?;
        Ok(Self::new(home_dir.join(DEFAULT_DIR)))
    }

    /// The directory holding one user's state.
    pub fn user_dir(&self, user_id: &str) -> PathBuf {
        self.base_dir.join("users").join(user_id)
    }

    pub fn conversations_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("conversations.json")
    }

    pub fn active_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("active.json")
    }

    pub fn settings_file(&self, user_id: &str) -> PathBuf {
        self.user_dir(user_id).join("settings.json")
    }
}
