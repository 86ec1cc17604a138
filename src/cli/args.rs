//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rockety - scaffold front-end projects and run their Gulp tasks
///
/// Creates a project from the latest Rockety release and proxies every
/// other command to the project's gulp tasks.
#[derive(Parser, Debug)]
#[command(name = "rockety")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ROCKETY_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Rockety project
    #[command(visible_alias = "install")]
    Create(CreateArgs),

    /// List the project's gulp tasks
    Tasks,

    /// Manage cached releases
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Any other command runs as a gulp task (build, watch, ...)
    #[command(external_subcommand)]
    External(Vec<String>),
}

/// Arguments for the create command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Name of the project directory to create
    pub name: Option<String>,

    /// Use the development branch instead of the latest release
    #[arg(long)]
    pub dev: bool,

    /// Skip the rockety version check
    #[arg(long)]
    pub noupdate: bool,

    /// Replace an existing project directory without asking
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// One identifier per line
    Plain,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cached releases
    List {
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove every cached release
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}
