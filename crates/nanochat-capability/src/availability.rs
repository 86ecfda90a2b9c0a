//! Capability availability states.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a capability's on-device model is ready to use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Availability {
    /// The capability is not supported or not permitted on this host.
    #[default]
    Unavailable,
    /// Supported, but the model must be downloaded first.
    Downloadable,
    /// The model download is in progress.
    Downloading,
    /// Ready to create sessions.
    Available,
}

impl Availability {
    /// True when sessions can be created right now.
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}
