//! CLI module for taskenv
//!
//! Provides command-line interface with the following subcommands:
//! - `env` - Resolve and print every variable
//! - `get` - Print one variable
//! - `init` - Create the config file from its template
//! - `config` - Show the loaded settings

pub mod commands;

pub use commands::{Cli, Commands, OutputFormat};
