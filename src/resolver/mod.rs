//! Environment resolution
//!
//! Evaluates the declared variables in order against a [`Context`] and a
//! [`CommandResolver`]:
//! - literal values are rendered as templates
//! - command values are captured, transformed, or replaced by their fallback
//! - path and clock values are derived in-process
//! - GIT_TAG_LATEST may bootstrap the initial tag when that is allowed

pub mod clock;
pub mod command;
pub mod dotenv;
pub mod env;
pub mod git;
pub mod path;
pub mod variable;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub use command::{CommandResolver, CommandSpec, ShellResolver};
pub use dotenv::{ensure_config, ConfigInit};
pub use env::{Entry, Origin, Resolution, ResolvedEnvironment};
pub use path::PathFacts;
pub use variable::{declared_variables, Group, PathPart, Source, Transform, Variable};

use crate::config::{render_template, Config};
use crate::error::EnvError;

/// Where and when the resolution happens
#[derive(Debug, Clone)]
pub struct Context {
    pub cwd: PathBuf,
    pub now: DateTime<Utc>,
}

impl Context {
    /// Context for `dir` (or the process working directory) at the current time
    pub fn current(dir: Option<&Path>) -> Result<Self, EnvError> {
        let cwd = match dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref()),
            None => std::env::current_dir()?,
        };
        Ok(Self {
            cwd,
            now: Utc::now(),
        })
    }
}

/// Switches of one resolution run
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Create the initial tag when the repository has none
    pub allow_tag_create: bool,
    /// Skip the config file initialization
    pub skip_dotenv: bool,
}

/// Resolve a path setting relative to the project directory
pub fn project_path(cwd: &Path, setting: &str) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(setting).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    }
}

/// Ensure the configured dot-env file exists below `cwd`
pub fn init_dotenv(config: &Config, cwd: &Path) -> Result<ConfigInit, EnvError> {
    let template = project_path(cwd, &config.dotenv.template);
    let target = project_path(cwd, &config.dotenv.target);
    ensure_config(&template, &target)
}

/// Evaluates variables in declaration order
pub struct Resolver<'a> {
    config: &'a Config,
    context: &'a Context,
    commands: &'a dyn CommandResolver,
    timezone: Tz,
    paths: PathFacts,
    allow_tag_create: bool,
}

impl<'a> Resolver<'a> {
    /// # Errors
    /// * `EnvError::InvalidTimezone` - the timezone setting is not an IANA name
    pub fn new(
        config: &'a Config,
        context: &'a Context,
        commands: &'a dyn CommandResolver,
    ) -> Result<Self, EnvError> {
        Ok(Self {
            config,
            context,
            commands,
            timezone: clock::parse_timezone(&config.timezone)?,
            paths: PathFacts::from_dir(&context.cwd),
            allow_tag_create: config.git.create_missing_tag,
        })
    }

    /// Allow (or forbid) creating the initial tag, overriding the setting
    pub fn allow_tag_create(mut self, allow: bool) -> Self {
        self.allow_tag_create = allow;
        self
    }

    /// Resolve every declared variable
    pub fn resolve(&self) -> Result<ResolvedEnvironment, EnvError> {
        let variables = declared_variables(self.config)?;
        let mut env = ResolvedEnvironment::default();

        for variable in &variables {
            let resolution = self.resolve_variable(variable, &env)?;
            tracing::debug!(
                name = %variable.name,
                value = %resolution.value,
                origin = ?resolution.origin,
                "Resolved variable"
            );
            env.push(variable.name.clone(), variable.group, resolution);
        }

        Ok(env)
    }

    fn resolve_variable(
        &self,
        variable: &Variable,
        env: &ResolvedEnvironment,
    ) -> Result<Resolution, EnvError> {
        let fallback = || Resolution::fallback(variable.fallback.clone().unwrap_or_default());

        let resolution = match &variable.source {
            Source::Literal(template) => {
                Resolution::resolved(render_template(&variable.name, template, |k| env.get(k))?)
            }
            Source::Clock => {
                Resolution::resolved(clock::format_time(self.context.now, self.timezone))
            }
            Source::Path(part) => Resolution::resolved(match part {
                PathPart::Realpath => self.paths.realpath.clone(),
                PathPart::Dirname => self.paths.dirname.clone(),
                PathPart::Basename => self.paths.basename.clone(),
            }),
            Source::Command { command, transform } => {
                match self.capture(&variable.name, command) {
                    Some(output) => match transform.apply(&output) {
                        Some(value) => Resolution::resolved(value),
                        None => {
                            tracing::debug!("{}: unusable output {:?}", variable.name, output);
                            fallback()
                        }
                    },
                    None => fallback(),
                }
            }
            Source::LatestTag => match self.latest_tag(&variable.name) {
                Some(tag) => Resolution::resolved(tag),
                None => fallback(),
            },
        };

        Ok(resolution)
    }

    /// Run a command, logging and swallowing command failures
    fn capture(&self, name: &str, command: &CommandSpec) -> Option<String> {
        match self.commands.capture(command) {
            Ok(output) => Some(output),
            Err(e) => {
                match &e {
                    EnvError::CommandFailed {
                        hint: Some(hint), ..
                    } => tracing::debug!("{}: {} ({})", name, e, hint),
                    e if e.is_command_error() => tracing::debug!("{}: {}", name, e),
                    e => tracing::warn!("{}: {}", name, e),
                }
                None
            }
        }
    }

    fn git(&self, args: &[&str]) -> CommandSpec {
        CommandSpec::git(&self.config.git.command, args.iter().copied())
    }

    /// Latest existing tag, or the created initial tag
    ///
    /// `None` means the fallback applies: tags could not be listed, none
    /// exist and creation is not allowed, or creation failed.
    fn latest_tag(&self, name: &str) -> Option<String> {
        let listing = self.capture(name, &self.git(&["tag", "--list"]))?;

        if let Some(tag) = git::latest_tag(&listing) {
            return Some(tag);
        }

        let initial = &self.config.git.initial_tag;
        if !self.allow_tag_create {
            tracing::warn!(
                "Repository has no tags; using {} without creating it (pass --create-tag to create it)",
                initial
            );
            return None;
        }

        let create = self.git(&[
            "tag",
            "-a",
            initial.as_str(),
            "-m",
            self.config.git.initial_tag_message.as_str(),
        ]);
        match self.commands.capture(&create) {
            Ok(_) => {
                tracing::info!("Created tag {}", initial);
                Some(initial.clone())
            }
            Err(e) => {
                tracing::warn!("Could not create tag {}: {}", initial, e);
                None
            }
        }
    }
}

/// Initialize the config file, then resolve the environment
///
/// # Errors
/// Fatal errors only: config initialization, timezone, variable
/// declarations and template references. Command failures become
/// fallbacks.
pub fn resolve_environment(
    config: &Config,
    context: &Context,
    commands: &dyn CommandResolver,
    options: ResolveOptions,
) -> Result<ResolvedEnvironment, EnvError> {
    let dotenv = if config.dotenv.enabled && !options.skip_dotenv {
        Some(init_dotenv(config, &context.cwd)?)
    } else {
        None
    };

    let resolver = Resolver::new(config, context, commands)?
        .allow_tag_create(options.allow_tag_create || config.git.create_missing_tag);

    let mut env = resolver.resolve()?;
    env.dotenv = dotenv;
    Ok(env)
}
