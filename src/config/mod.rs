//! Resolver configuration management for `controllers.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `[resolver]`   | Execution mode, failure policy                   |
//! | `[[sources]]`  | Controller directories, patterns and extensions  |

mod error;
mod section;

pub use error::ConfigError;
pub use section::{ResolverSection, SourceSection};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::log;

/// Default config file name.
pub const DEFAULT_CONFIG_FILE: &str = "controllers.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing controllers.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file; source roots are relative to it
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub resolver: ResolverSection,

    #[serde(default)]
    pub sources: Vec<SourceSection>,
}

impl ResolverConfig {
    /// Read, parse and validate the config at `path`.
    ///
    /// Unknown fields are reported as warnings and otherwise ignored.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_path(path)?;
        config.config_path = path.to_path_buf();
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        crate::logger::log_list(fields);
    }

    /// Check every source root and pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, source) in self.sources.iter().enumerate() {
            if source.root.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "`sources[{index}].root` must not be empty"
                )));
            }
            if source.extensions.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "`sources[{index}].extensions` must list at least one extension"
                )));
            }
            source.compiled_pattern(&format!("sources[{index}].pattern"))?;
        }
        Ok(())
    }

    /// Absolute (or config-relative) directory of `source`.
    pub fn source_root(&self, source: &SourceSection) -> PathBuf {
        if source.root.is_absolute() {
            source.root.clone()
        } else {
            self.root.join(&source.root)
        }
    }
}

// ============================================================================
// tests
// ============================================================================
