//! CLI command definitions using clap
//!
//! Defines all CLI subcommands and their arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Project environment resolver for task runners.
///
/// Derives namespace, path, git and time facts for the current project,
/// initializes the local config file from its template, and reports them.
#[derive(Parser, Debug)]
#[command(name = "taskenv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (overrides default XDG paths)
    #[arg(short, long, global = true, env = "TASKENV_CONFIG")]
    pub config: Option<String>,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve and print every variable
    Env(EnvArgs),

    /// Print the value of a single variable
    Get(GetArgs),

    /// Create the config file from its template if it is missing
    Init,

    /// Show the loaded settings
    Config(ConfigArgs),
}

/// Arguments for the `env` subcommand
#[derive(Parser, Debug)]
pub struct EnvArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Create the initial tag if the repository has no tags
    #[arg(long)]
    pub create_tag: bool,

    /// Skip the config file initialization
    #[arg(long)]
    pub skip_dotenv: bool,
}

/// Arguments for the `get` subcommand
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Variable name (e.g. GIT_TAG_LATEST)
    #[arg(required = true)]
    pub name: String,

    /// Create the initial tag if the repository has no tags
    #[arg(long)]
    pub create_tag: bool,

    /// Skip the config file initialization
    #[arg(long)]
    pub skip_dotenv: bool,
}

/// Arguments for the `config` subcommand
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable `NAME: value` report
    Table,
    /// JSON output
    Json,
    /// `NAME=value` lines
    Plain,
}
