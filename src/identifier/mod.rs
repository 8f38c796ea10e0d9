//! Controller identifiers derived from loader keys.
//!
//! Bundler globs key every loader by the path of its file, but the document
//! refers to controllers by identifier. The conversion is:
//!
//! ```text
//! ./a_controller.js                                         -> a
//! ../app/javascript/controllers/blogs/previous_updates_controller.js
//!                                                           -> blogs--previous-updates
//! ```
//!
//! The logical name is captured by a pattern with exactly one group, then
//! `_` becomes `-` and `/` becomes `--`.

mod extractor;

pub use extractor::{DefaultExtractor, Extract};

use regex::Regex;
use std::sync::LazyLock;

/// Default pattern for controller file keys.
///
/// Strips a leading `…/controllers/`, `…/components/`, `./` or `../`, and a
/// trailing `_controller.<ext>` or `-controller.<ext>`.
pub const CONTROLLER_FILENAME_PATTERN: &str =
    r"^(?:.*?(?:controllers|components)/|\.?\./)?(.+?)(?:[_-]controller\..+?)$";

static CONTROLLER_FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CONTROLLER_FILENAME_PATTERN).unwrap());

/// The compiled default pattern.
pub fn default_pattern() -> &'static Regex {
    &CONTROLLER_FILENAME_REGEX
}

/// Extract the identifier for `key` using the default pattern.
///
/// Returns `None` when the key does not look like a controller file.
pub fn extract_identifier(key: &str) -> Option<String> {
    extract_identifier_with(key, default_pattern())
}

/// Extract the identifier for `key` using a custom pattern.
///
/// The first capture group is the logical name. A missing group or an empty
/// capture yields `None`.
pub fn extract_identifier_with(key: &str, pattern: &Regex) -> Option<String> {
    let logical_name = pattern.captures(key)?.get(1)?.as_str();
    if logical_name.is_empty() {
        return None;
    }
    Some(normalize_logical_name(logical_name))
}

/// `_` -> `-`, `/` -> `--`.
fn normalize_logical_name(name: &str) -> String {
    let mut identifier = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        match ch {
            '_' => identifier.push('-'),
            '/' => identifier.push_str("--"),
            _ => identifier.push(ch),
        }
    }
    identifier
}

/// Number of capture groups in `pattern`, not counting the implicit whole match.
pub fn capture_group_count(pattern: &Regex) -> usize {
    pattern.captures_len().saturating_sub(1)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_default_pattern() {
        for (key, expected) in [
            ("./a_controller.js", "a"),
            ("./b_controller.ts", "b"),
            (
                "../app/javascript/controllers/blogs/previous_updates_controller.js",
                "blogs--previous-updates",
            ),
        ] {
            assert_eq!(extract_identifier(key).as_deref(), Some(expected), "{key}");
        }
    }

    #[test]
    fn test_extract_dash_suffix_and_components() {
        assert_eq!(
            extract_identifier("./hello-controller.js").as_deref(),
            Some("hello")
        );
        assert_eq!(
            extract_identifier("../../components/cards/album_card_controller.tsx").as_deref(),
            Some("cards--album-card")
        );
        assert_eq!(
            extract_identifier("nested/deep/toggle_controller.mjs").as_deref(),
            Some("nested--deep--toggle")
        );
    }

    #[test]
    fn test_extract_non_controller_is_none() {
        assert_eq!(extract_identifier("./application.js"), None);
        assert_eq!(extract_identifier("./controllers/index.js"), None);
        assert_eq!(extract_identifier(""), None);
    }

    #[test]
    fn test_extract_custom_pattern() {
        let pattern = Regex::new(r"^.+sprinkles/(.+?)_controller.js$").unwrap();
        let key = "../../../components/blogs/app/javascript/sprinkles/blogs/previous_updates_controller.js";
        assert_eq!(
            extract_identifier_with(key, &pattern).as_deref(),
            Some("blogs--previous-updates")
        );
        assert_eq!(extract_identifier_with("./a_controller.js", &pattern), None);
    }

    #[test]
    fn test_extract_pattern_without_group() {
        let pattern = Regex::new(r"_controller\.js$").unwrap();
        assert_eq!(extract_identifier_with("./a_controller.js", &pattern), None);
        assert_eq!(capture_group_count(&pattern), 0);
        assert_eq!(capture_group_count(default_pattern()), 1);
    }
}
