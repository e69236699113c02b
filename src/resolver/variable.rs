//! Variable declarations
//!
//! The built-in table lists every variable with its derivation rule and,
//! for command-derived ones, the fallback used when the command fails.

use std::collections::HashSet;

use serde::Serialize;

use super::command::CommandSpec;
use super::git;
use crate::config::{Config, CustomVar};
use crate::error::EnvError;

/// Report group, printed in declaration order with blank lines between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    General,
    Path,
    Git,
    Custom,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::General => write!(f, "general"),
            Group::Path => write!(f, "path"),
            Group::Git => write!(f, "git"),
            Group::Custom => write!(f, "custom"),
        }
    }
}

/// Which path fact a variable takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPart {
    Realpath,
    Dirname,
    Basename,
}

/// Post-processing of captured command output
///
/// `None` from [`Transform::apply`] means the output is unusable and the
/// fallback applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trimmed,
    GitSource,
    GitProject,
    Branch,
}

impl Transform {
    pub fn apply(self, output: &str) -> Option<String> {
        let output = output.trim();
        if output.is_empty() {
            return None;
        }
        match self {
            Transform::Trimmed => Some(output.to_string()),
            Transform::GitSource => Some(git::source_url(output)),
            Transform::GitProject => Some(git::project_name(output)).filter(|p| !p.is_empty()),
            Transform::Branch => git::branch_name(output),
        }
    }
}

/// How a variable gets its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Template with `$VAR` and `{{.NAME}}` substitution
    Literal(String),
    /// Captured output of an external command
    Command {
        command: CommandSpec,
        transform: Transform,
    },
    /// Current time in the configured timezone
    Clock,
    /// A fact about the working directory
    Path(PathPart),
    /// Highest version-sorted tag, bootstrapping one when allowed
    LatestTag,
}

/// A named entry of the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub group: Group,
    pub source: Source,
    /// Value used when the derivation fails
    pub fallback: Option<String>,
}

impl Variable {
    fn new(name: &str, group: Group, source: Source) -> Self {
        Self {
            name: name.to_string(),
            group,
            source,
            fallback: None,
        }
    }

    fn or_else(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

fn git_command(config: &Config, args: &[&str]) -> CommandSpec {
    CommandSpec::git(&config.git.command, args.iter().copied())
}

/// The built-in variable table, in report order
pub fn builtin_variables(config: &Config) -> Vec<Variable> {
    let remote_url = git_command(config, &["remote", "get-url", config.git.remote.as_str()]);

    vec![
        Variable::new(
            "NAMESPACE",
            Group::General,
            Source::Literal(config.namespace.clone()),
        ),
        Variable::new(
            "DEVELOPER",
            Group::General,
            Source::Literal(config.developer.clone()),
        ),
        Variable::new("TIME_NOW", Group::General, Source::Clock),
        Variable::new("PATH_REALPATH", Group::Path, Source::Path(PathPart::Realpath)),
        Variable::new("PATH_DIRNAME", Group::Path, Source::Path(PathPart::Dirname)),
        Variable::new("PATH_BASENAME", Group::Path, Source::Path(PathPart::Basename)),
        Variable::new(
            "GIT_SOURCE",
            Group::Git,
            Source::Command {
                command: remote_url.clone(),
                transform: Transform::GitSource,
            },
        )
        .or_else(""),
        Variable::new(
            "GIT_PROJECT",
            Group::Git,
            Source::Command {
                command: remote_url,
                transform: Transform::GitProject,
            },
        )
        .or_else(""),
        Variable::new("GIT_TAG_LATEST", Group::Git, Source::LatestTag)
            .or_else(config.git.initial_tag.as_str()),
        Variable::new(
            "GIT_BRANCH",
            Group::Git,
            Source::Command {
                command: git_command(config, &["rev-parse", "--abbrev-ref", "HEAD"]),
                transform: Transform::Branch,
            },
        )
        .or_else(config.git.default_branch.as_str()),
        Variable::new(
            "GIT_COMMIT",
            Group::Git,
            Source::Command {
                command: git_command(config, &["rev-parse", "--short", "HEAD"]),
                transform: Transform::Trimmed,
            },
        )
        .or_else(config.git.default_commit.as_str()),
    ]
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn custom_variable(var: &CustomVar, shell: &str) -> Result<Variable, EnvError> {
    let source = match (&var.value, &var.sh) {
        (Some(value), None) => Source::Literal(value.clone()),
        (None, Some(script)) => Source::Command {
            command: CommandSpec::shell(shell, script),
            transform: Transform::Trimmed,
        },
        _ => {
            return Err(EnvError::Config(format!(
                "variable '{}' needs exactly one of 'value' or 'sh'",
                var.name
            )))
        }
    };

    if matches!(source, Source::Literal(_)) && var.fallback.is_some() {
        return Err(EnvError::Config(format!(
            "variable '{}': 'fallback' only applies to 'sh' variables",
            var.name
        )));
    }

    let fallback = matches!(source, Source::Command { .. })
        .then(|| var.fallback.clone().unwrap_or_default());

    Ok(Variable {
        name: var.name.clone(),
        group: Group::Custom,
        source,
        fallback,
    })
}

/// Built-in table followed by the configured `[[vars]]`
///
/// # Errors
/// * `EnvError::Config` - invalid or duplicate names, a custom variable
///   with neither or both of `value` and `sh`, or a `fallback` on a
///   `value` variable
pub fn declared_variables(config: &Config) -> Result<Vec<Variable>, EnvError> {
    let mut variables = builtin_variables(config);
    let mut seen: HashSet<String> = variables.iter().map(|v| v.name.clone()).collect();

    for var in &config.vars {
        if !valid_name(&var.name) {
            return Err(EnvError::Config(format!(
                "invalid variable name '{}'",
                var.name
            )));
        }
        if !seen.insert(var.name.clone()) {
            return Err(EnvError::Config(format!(
                "variable '{}' is declared more than once",
                var.name
            )));
        }
        variables.push(custom_variable(var, &config.exec.shell)?);
    }

    Ok(variables)
}
