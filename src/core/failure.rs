//! What the engine does with an identifier whose load failed.

use serde::{Deserialize, Serialize};

/// Handling of the in-flight mark after a failed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the identifier marked as loading, so this engine never retries it.
    #[default]
    Retain,
    /// Clear the mark, so a later notification may retry the load.
    Release,
}

impl FailurePolicy {
    #[inline]
    pub const fn releases(&self) -> bool {
        matches!(self, Self::Release)
    }
}
