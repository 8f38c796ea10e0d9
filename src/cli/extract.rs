//! `extract` command: loader key -> identifier.

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use regex::Regex;

use controller_resolver::identifier::{capture_group_count, default_pattern, extract_identifier_with};
use controller_resolver::log;

/// Print one line per key: the identifier, or `skipped` if the key does not match.
pub fn run_extract(keys: &[String], pattern: Option<&str>) -> Result<()> {
    let custom = pattern
        .map(|p| Regex::new(p).with_context(|| format!("invalid pattern `{p}`")))
        .transpose()?;
    if let Some(regex) = &custom
        && capture_group_count(regex) != 1
    {
        bail!("pattern `{}` must have exactly one capture group", regex.as_str());
    }
    let regex: &Regex = custom.as_ref().unwrap_or_else(|| default_pattern());

    for (key, identifier) in extract_all(keys, regex) {
        match identifier {
            Some(identifier) => log!("extract"; "{} {} {}", key, "->".dimmed(), identifier.bold()),
            None => log!("extract"; "{} {} {}", key, "->".dimmed(), "skipped".dimmed()),
        }
    }
    Ok(())
}

fn extract_all<'a>(keys: &'a [String], pattern: &Regex) -> Vec<(&'a str, Option<String>)> {
    keys.iter()
        .map(|key| (key.as_str(), extract_identifier_with(key, pattern)))
        .collect()
}
