//! Command implementations.

pub mod args;
pub mod extract;
pub mod scan;

pub use args::{Cli, Commands};

use anyhow::Result;
use controller_resolver::config::ResolverConfig;
use controller_resolver::log;

/// `check` command: load and validate the config, then summarize it.
pub fn run_check(config: &ResolverConfig) -> Result<()> {
    log!(
        "check";
        "{}: {} sources, {} mode, {:?} on failure",
        config.config_path.display(),
        config.sources.len(),
        config.resolver.mode.label(),
        config.resolver.on_failure
    );
    for source in &config.sources {
        let pattern = source.pattern.as_deref().unwrap_or("default pattern");
        log!("check"; "{} ({}) [{}]", config.source_root(source).display(), pattern, source.extensions.join(", "));
    }
    Ok(())
}
