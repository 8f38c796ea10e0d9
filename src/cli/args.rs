//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Controller resolver CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: controllers.toml)
    #[arg(short = 'C', long, global = true, default_value = "controllers.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the controller identifier for each loader key
    #[command(visible_alias = "e")]
    Extract {
        /// Loader keys, e.g. `./controllers/blogs/previous_updates_controller.js`
        #[arg(required = true)]
        keys: Vec<String>,

        /// Pattern with one capture group (default: controller filename pattern)
        #[arg(short, long)]
        pattern: Option<String>,
    },

    /// Scan configured sources and print the identifier map
    #[command(visible_alias = "s")]
    Scan {
        /// Fail when a later source overrides an identifier
        #[arg(long)]
        deny_collisions: bool,
    },

    /// Validate the config file
    #[command(visible_alias = "c")]
    Check,
}
