//! Pluggable key -> identifier strategies.

use regex::Regex;

/// Turns a loader key into an identifier.
///
/// Receives the pattern configured for the source, which custom strategies
/// are free to ignore. `None` means the entry is skipped.
pub trait Extract: Send + Sync {
    fn extract(&self, key: &str, pattern: &Regex) -> Option<String>;
}

/// Pattern capture plus the `_`/`/` normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl Extract for DefaultExtractor {
    fn extract(&self, key: &str, pattern: &Regex) -> Option<String> {
        super::extract_identifier_with(key, pattern)
    }
}

impl<F> Extract for F
where
    F: Fn(&str, &Regex) -> Option<String> + Send + Sync,
{
    fn extract(&self, key: &str, pattern: &Regex) -> Option<String> {
        self(key, pattern)
    }
}
