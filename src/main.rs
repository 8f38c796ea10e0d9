//! controller-resolver - inspect how loader keys map to controller identifiers.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use controller_resolver::config::ResolverConfig;
use controller_resolver::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Extract { keys, pattern } => cli::extract::run_extract(keys, pattern.as_deref()),
        Commands::Scan { deny_collisions } => {
            let config = load_config(&cli)?;
            cli::scan::run_scan(&config, *deny_collisions)
        }
        Commands::Check => {
            let config = load_config(&cli)?;
            cli::run_check(&config)
        }
    }
}

fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    ResolverConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))
}
