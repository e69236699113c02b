//! taskenv - Project environment resolution for task runners
//!
//! Derives a fixed set of named facts about the current project and
//! reports them:
//! - **General** - NAMESPACE, DEVELOPER, TIME_NOW (fixed timezone)
//! - **Path** - PATH_REALPATH, PATH_DIRNAME, PATH_BASENAME
//! - **Git** - GIT_SOURCE, GIT_PROJECT, GIT_TAG_LATEST, GIT_BRANCH, GIT_COMMIT
//!
//! ## Features
//!
//! - Idempotent `.env` initialization from `.env.example`
//! - Git lookups that degrade to declared fallbacks outside a repository
//! - Opt-in bootstrap of an initial version tag
//! - XDG-compliant layered configuration with custom `[[vars]]`
//! - Table, JSON and `NAME=value` output

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod resolver;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{ErrorInfo, EnvError};
pub use executor::{exec_command, ExecOptions, ExecResult, Executor};
pub use resolver::{
    ensure_config, resolve_environment, CommandResolver, CommandSpec, ConfigInit, Context,
    ResolveOptions, ResolvedEnvironment, Resolver, ShellResolver,
};
