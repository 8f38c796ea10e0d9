//! Execution mode for development/production resolver builds.

use serde::{Deserialize, Serialize};

/// Execution mode of the resolver.
///
/// Only affects diagnostics: development mode reports identifiers that no
/// source can resolve, production mode stays silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Optimized build: unresolved identifiers are skipped silently.
    #[default]
    Production,
    /// Unoptimized build: unresolved identifiers are reported.
    Development,
}

impl ExecutionMode {
    /// Check if this is development mode.
    #[inline]
    pub const fn is_dev(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_production() {
        assert_eq!(ExecutionMode::default(), ExecutionMode::Production);
        assert!(!ExecutionMode::default().is_dev());
        assert!(ExecutionMode::Development.is_dev());
    }
}
