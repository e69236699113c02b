//! Command resolver capability
//!
//! All external-process access goes through [`CommandResolver`], so the
//! derivation rules can be tested against canned outputs.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::error::EnvError;
use crate::executor::{ExecOptions, Executor};

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Environment set for this command only
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: Vec::new(),
        }
    }

    /// A git invocation with untranslated messages and no credential prompt
    ///
    /// The C locale keeps stderr matching the hints in `suggest_fix`.
    pub fn git<'s>(program: &str, args: impl IntoIterator<Item = &'s str>) -> Self {
        Self::new(program, args)
            .with_env("LC_ALL", "C")
            .with_env("GIT_TERMINAL_PROMPT", "0")
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// `<shell> -c <script>`
    pub fn shell(shell: &str, script: &str) -> Self {
        Self::new(shell, ["-c", script])
    }

    /// Whether the arguments start with `prefix`
    pub fn has_args(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs a command and returns its trimmed standard output
///
/// Implementations return `Err` for any failure (spawn, exit status,
/// timeout). Callers decide which fallback applies.
#[cfg_attr(test, mockall::automock)]
pub trait CommandResolver {
    fn capture(&self, command: &CommandSpec) -> Result<String, EnvError>;
}

/// [`CommandResolver`] backed by real processes
pub struct ShellResolver {
    executor: Executor,
    options: ExecOptions,
}

impl ShellResolver {
    /// Run commands in `dir` with the configured timeout
    pub fn new(dir: &Path, config: &Config) -> Result<Self, EnvError> {
        Ok(Self {
            executor: Executor::new()?,
            options: ExecOptions::in_dir(dir).with_timeout_secs(config.exec.timeout_secs),
        })
    }

    fn check_available(&self, command: &CommandSpec) -> Result<(), EnvError> {
        // Paths are left to the spawn itself
        if command.program.contains(std::path::MAIN_SEPARATOR) {
            return Ok(());
        }
        which::which(&command.program)
            .map(|_| ())
            .map_err(|e| EnvError::SpawnFailed {
                command: command.to_string(),
                error: e.to_string(),
            })
    }
}

impl CommandResolver for ShellResolver {
    fn capture(&self, command: &CommandSpec) -> Result<String, EnvError> {
        self.check_available(command)?;

        let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
        let options = command
            .env
            .iter()
            .fold(self.options.clone(), |options, (k, v)| options.with_env(k, v));

        self.executor
            .run(&command.program, &args, &options)?
            .into_output(&command.to_string())
    }
}
