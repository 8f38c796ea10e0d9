//! `[resolver]` and `[[sources]]` sections.
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! mode = "development"        # Report unresolved identifiers
//! on_failure = "retain"       # Never retry a controller whose load failed
//!
//! [[sources]]
//! root = "app/javascript/controllers"
//!
//! [[sources]]
//! root = "components"
//! pattern = '^.+sprinkles/(.+?)_controller\.js$'
//! extensions = ["js"]
//! ```

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::{ExecutionMode, FailurePolicy};
use crate::engine::EngineOptions;
use crate::identifier::capture_group_count;
use crate::resolver::GlobResolver;

// ============================================================================
// [resolver]
// ============================================================================

/// Resolver and engine behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverSection {
    /// Execution mode (diagnostics only in development).
    pub mode: ExecutionMode,
    /// What the engine does after a failed load.
    pub on_failure: FailurePolicy,
}

impl ResolverSection {
    /// Configure `resolver` with the execution mode of this section.
    pub fn apply<T: Send + 'static>(&self, resolver: GlobResolver<T>) -> GlobResolver<T> {
        resolver.with_mode(self.mode)
    }

    /// Engine options on the current runtime.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            on_failure: self.on_failure,
            runtime: None,
        }
    }
}

// ============================================================================
// [[sources]]
// ============================================================================

const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "jsx", "tsx", "mjs"];

/// One directory of controller files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SourceSection {
    /// Directory scanned for controllers (relative to the config file).
    pub root: PathBuf,
    /// Identifier pattern with exactly one capture group.
    /// Falls back to the default controller filename pattern.
    pub pattern: Option<String>,
    /// File extensions to include.
    pub extensions: Vec<String>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            pattern: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl SourceSection {
    /// Compile the configured pattern, checking it captures exactly one group.
    pub fn compiled_pattern(&self, field: &str) -> Result<Option<Regex>, ConfigError> {
        let Some(pattern) = &self.pattern else {
            return Ok(None);
        };

        let regex = Regex::new(pattern).map_err(|source| ConfigError::Pattern {
            field: field.to_string(),
            source,
        })?;

        let groups = capture_group_count(&regex);
        if groups != 1 {
            return Err(ConfigError::Validation(format!(
                "`{field}` must have exactly one capture group, found {groups}"
            )));
        }

        Ok(Some(regex))
    }

    /// Whether `ext` is one of the configured extensions.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.trim_start_matches('.') == ext)
    }
}
