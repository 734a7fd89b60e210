use crate::config::toml_config::DEFAULT_CONFIG_PATH;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "slot-notifier")]
#[command(about = "Polls public session availability and raises a desktop alert on matches")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Show the resolved query plan without fetching
    #[arg(long)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a default configuration file
    Init {
        /// Where to write the file (defaults to --config)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
