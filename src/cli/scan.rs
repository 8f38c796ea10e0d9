//! `scan` command: enumerate controller files like a bundler glob would.
//!
//! Each configured source root is walked and every file with an accepted
//! extension becomes a glob entry keyed `./<path relative to root>`. The
//! entries are folded with the same rules the runtime resolver uses, so the
//! printed table is exactly what `create_resolver` would see.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use jwalk::WalkDir;
use owo_colors::OwoColorize;

use controller_resolver::config::ResolverConfig;
use controller_resolver::source::{Glob, GlobSource, IdentifierMap, SourceConfig, normalize};
use controller_resolver::{debug, log};

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Scan all sources and print the identifier map.
pub fn run_scan(config: &ResolverConfig, deny_collisions: bool) -> Result<()> {
    let map = scan_sources(config)?;

    log!("scan"; "{} controllers from {} sources", map.len(), config.sources.len());
    let width = map.identifiers().map(str::len).max().unwrap_or(0);
    for (identifier, entry) in map.iter() {
        println!(
            "  {:<width$} {} {}",
            identifier.bold(),
            format!("[{}]", entry.source).dimmed(),
            entry.key
        );
    }

    for collision in map.collisions() {
        log!(
            "warning";
            "`{}`: {} (source {}) overrides {} (source {})",
            collision.identifier,
            collision.winning_key,
            collision.winning_source,
            collision.shadowed_key,
            collision.shadowed_source
        );
    }

    for key in map.skipped() {
        debug!("scan"; "skipped {}", key);
    }

    if deny_collisions && !map.collisions().is_empty() {
        bail!("{} identifiers defined by more than one source", map.collisions().len());
    }
    Ok(())
}

/// Build the identifier -> file map for every configured source.
pub fn scan_sources(config: &ResolverConfig) -> Result<IdentifierMap<PathBuf>> {
    let mut sources = Vec::with_capacity(config.sources.len());

    for (index, section) in config.sources.iter().enumerate() {
        let root = config.source_root(section);
        if !root.is_dir() {
            log!("warning"; "source root {} does not exist", root.display());
        }

        let glob = collect_glob(&root, |ext| section.accepts_extension(ext));
        debug!("scan"; "{}: {} files", root.display(), glob.len());

        let source: GlobSource<PathBuf> =
            match section.compiled_pattern(&format!("sources[{index}].pattern"))? {
                Some(pattern) => SourceConfig::new(glob).with_pattern(pattern).into(),
                None => glob.into(),
            };
        sources.push(normalize(source));
    }

    Ok(IdentifierMap::build(sources))
}

/// Collect files below `root` keyed like a bundler glob.
fn collect_glob(root: &Path, accepts: impl Fn(&str) -> bool) -> Glob<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(&accepts)
        })
        .map(|path| (glob_key(root, &path), path))
        .collect()
}

/// `./<relative path>` with forward slashes.
fn glob_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    format!("./{}", segments.join("/"))
}
