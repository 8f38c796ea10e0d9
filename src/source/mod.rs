//! Glob sources: path-keyed collections of loaders.
//!
//! A bundler enumerates matching files at build time and hands over a
//! mapping from each file key to a lazy loader. Callers pass one or more of
//! these, either as-is or wrapped in a [`SourceConfig`] that overrides the
//! pattern and/or the extraction strategy:
//!
//! ```ignore
//! let sources = vec![
//!     GlobSource::from(glob),
//!     SourceConfig::new(sprinkles).with_pattern(sprinkles_pattern).into(),
//! ];
//! let map = IdentifierMap::build(sources.into_iter().map(normalize));
//! ```
//!
//! Sources are generic over the entry value, so the same fold serves the
//! runtime (`V = Loader<T>`) and the scanning CLI (`V = PathBuf`).

mod map;

pub use map::{Collision, IdentifierMap, MapEntry};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::identifier::{DefaultExtractor, Extract, default_pattern};

// =============================================================================
// Glob
// =============================================================================

/// Mapping from loader key to entry, iterated in key order.
pub type Glob<V> = BTreeMap<String, V>;

// =============================================================================
// Source Config
// =============================================================================

/// A glob wrapped with an optional pattern and extraction strategy.
pub struct SourceConfig<V> {
    pub glob: Glob<V>,
    pub pattern: Option<Regex>,
    pub extractor: Option<Arc<dyn Extract>>,
}

impl<V> SourceConfig<V> {
    pub fn new(glob: Glob<V>) -> Self {
        Self {
            glob,
            pattern: None,
            extractor: None,
        }
    }

    /// Use `pattern` instead of the default controller filename pattern.
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Use a custom key -> identifier strategy.
    pub fn with_extractor(mut self, extractor: impl Extract + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }
}

impl<V> fmt::Debug for SourceConfig<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("keys", &self.glob.keys().collect::<Vec<_>>())
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom_extractor", &self.extractor.is_some())
            .finish()
    }
}

// =============================================================================
// Glob Source
// =============================================================================

/// One source passed to the resolver factory.
#[derive(Debug)]
pub enum GlobSource<V> {
    /// A bare glob, read with the default pattern and extractor.
    Plain(Glob<V>),
    /// A glob with overrides.
    Configured(SourceConfig<V>),
}

impl<V> From<Glob<V>> for GlobSource<V> {
    fn from(glob: Glob<V>) -> Self {
        Self::Plain(glob)
    }
}

impl<V> From<SourceConfig<V>> for GlobSource<V> {
    fn from(config: SourceConfig<V>) -> Self {
        Self::Configured(config)
    }
}

impl<V> FromIterator<(String, V)> for GlobSource<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self::Plain(iter.into_iter().collect())
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// A source with every field filled in.
pub struct NormalizedSource<V> {
    pub glob: Glob<V>,
    pub extractor: Arc<dyn Extract>,
    pub pattern: Regex,
}

impl<V> NormalizedSource<V> {
    /// Identifier for `key` under this source's strategy.
    #[inline]
    pub fn identifier_for(&self, key: &str) -> Option<String> {
        self.extractor.extract(key, &self.pattern)
    }
}

impl<V> fmt::Debug for NormalizedSource<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedSource")
            .field("entries", &self.glob.len())
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Fill unset fields with the default extractor and pattern.
pub fn normalize<V>(source: GlobSource<V>) -> NormalizedSource<V> {
    match source {
        GlobSource::Plain(glob) => NormalizedSource {
            glob,
            extractor: Arc::new(DefaultExtractor),
            pattern: default_pattern().clone(),
        },
        GlobSource::Configured(SourceConfig {
            glob,
            pattern,
            extractor,
        }) => NormalizedSource {
            glob,
            extractor: extractor.unwrap_or_else(|| Arc::new(DefaultExtractor)),
            pattern: pattern.unwrap_or_else(|| default_pattern().clone()),
        },
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::CONTROLLER_FILENAME_PATTERN;

    fn glob(keys: &[&str]) -> Glob<u32> {
        keys.iter()
            .enumerate()
            .map(|(i, key)| (key.to_string(), i as u32))
            .collect()
    }

    #[test]
    fn test_normalize_plain_uses_defaults() {
        let normalized = normalize(GlobSource::from(glob(&["./a_controller.js"])));
        assert_eq!(normalized.pattern.as_str(), CONTROLLER_FILENAME_PATTERN);
        assert_eq!(
            normalized.identifier_for("./a_controller.js").as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_normalize_config_keeps_pattern() {
        let pattern = Regex::new(r"/(.+?)_controller.js$").unwrap();
        let source = SourceConfig::new(glob(&["./b_controller.js"])).with_pattern(pattern);
        let normalized = normalize(GlobSource::from(source));
        assert_eq!(normalized.pattern.as_str(), r"/(.+?)_controller.js$");
        assert_eq!(
            normalized.identifier_for("./b_controller.js").as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_normalize_config_keeps_extractor() {
        let source = SourceConfig::new(glob(&["./whatever.js"]))
            .with_extractor(|_: &str, _: &Regex| Some("c".to_string()));
        let normalized = normalize(GlobSource::from(source));
        assert_eq!(normalized.pattern.as_str(), CONTROLLER_FILENAME_PATTERN);
        assert_eq!(normalized.identifier_for("./whatever.js").as_deref(), Some("c"));
    }

    #[test]
    fn test_normalize_empty_config() {
        let normalized = normalize(GlobSource::from(SourceConfig::<u32>::new(Glob::new())));
        assert!(normalized.glob.is_empty());
    }
}
