//! taskenv CLI entry point
//!
//! Usage:
//!   taskenv env              Resolve and print every variable
//!   taskenv get <NAME>       Print one variable
//!   taskenv init             Create .env from .env.example if missing
//!   taskenv config           Show the loaded settings

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use taskenv::cli::{
    commands::{ConfigArgs, EnvArgs, GetArgs},
    Cli, Commands, OutputFormat,
};
use taskenv::config::{find_config_files, load_config, Config};
use taskenv::error::{EnvError, ErrorInfo};
use taskenv::report;
use taskenv::resolver::{
    init_dotenv, resolve_environment, Context, Origin, ResolveOptions, ResolvedEnvironment,
    ShellResolver,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins; otherwise `-v` enables debug output for this crate.
/// `TASKENV_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "taskenv=debug" } else { "taskenv=warn" })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if std::env::var("TASKENV_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let context = Context::current(cli.dir.as_deref()).context("Failed to get current directory")?;
    let config = load_config(&context.cwd, cli.config.as_deref())?;

    match cli.command {
        Commands::Env(args) => show_env(args, &config, &context, cli.verbose)?,
        Commands::Get(args) => get_variable(args, &config, &context)?,
        Commands::Init => init_config_file(&config, &context)?,
        Commands::Config(args) => show_config(args, &config, &context)?,
    }

    Ok(())
}

/// Run the full pipeline against real processes
fn resolve(config: &Config, context: &Context, options: ResolveOptions) -> Result<ResolvedEnvironment, EnvError> {
    let commands = ShellResolver::new(&context.cwd, config)?;
    resolve_environment(config, context, &commands, options)
}

/// Print the resolved environment
fn show_env(args: EnvArgs, config: &Config, context: &Context, verbose: bool) -> Result<()> {
    let options = ResolveOptions {
        allow_tag_create: args.create_tag,
        skip_dotenv: args.skip_dotenv,
    };

    let env = match resolve(config, context, options) {
        Ok(env) => env,
        Err(e) => {
            if args.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&ErrorInfo::from(&e))?);
            }
            return Err(e.into());
        }
    };

    match args.format {
        OutputFormat::Table => {
            print!("{}", report::render_table(&env, std::io::stdout().is_terminal()));
        }
        OutputFormat::Json => println!("{}", report::render_json(&env)?),
        OutputFormat::Plain => print!("{}", report::render_plain(&env)),
    }

    if verbose {
        if let Some(init) = env.dotenv {
            eprintln!(
                "{}: {} {}",
                "dotenv".cyan(),
                init,
                config.dotenv.target
            );
        }
        let fallbacks: Vec<&str> = env
            .iter()
            .filter(|e| e.origin == Origin::Fallback)
            .map(|e| e.name.as_str())
            .collect();
        if !fallbacks.is_empty() {
            eprintln!("{}: {}", "defaulted".yellow(), fallbacks.join(", "));
        }
    }

    Ok(())
}

/// Print one resolved variable
fn get_variable(args: GetArgs, config: &Config, context: &Context) -> Result<()> {
    let options = ResolveOptions {
        allow_tag_create: args.create_tag,
        skip_dotenv: args.skip_dotenv,
    };
    let env = resolve(config, context, options)?;

    let value = env
        .get(&args.name)
        .ok_or_else(|| EnvError::UnknownVariable(args.name.clone()))?;
    println!("{}", value);

    Ok(())
}

/// Only the config file initialization
fn init_config_file(config: &Config, context: &Context) -> Result<()> {
    let init = init_dotenv(config, &context.cwd)?;
    println!("{} {}", init, config.dotenv.target);
    Ok(())
}

/// Show the loaded settings
fn show_config(args: ConfigArgs, config: &Config, context: &Context) -> Result<()> {
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Plain => {
            print!("{}", toml::to_string_pretty(config)?);
        }
        OutputFormat::Table => {
            println!("{}:", "Config Files".cyan());
            let files = find_config_files(&context.cwd);
            if files.is_empty() {
                println!("  None (using defaults)");
            } else {
                for file in &files {
                    println!("  - {}", file.display());
                }
            }
            println!();
            print!(
                "{}",
                toml::to_string_pretty(config).context("Failed to render configuration")?
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_config_file_creates_then_keeps() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".env.example"), "PORT=8000\n").unwrap();
        let context = Context::current(Some(dir.path())).unwrap();
        let config = Config::default();

        init_config_file(&config, &context).unwrap();
        std::fs::write(dir.path().join(".env"), "PORT=9000\n").unwrap();
        init_config_file(&config, &context).unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join(".env")).unwrap(),
            "PORT=9000\n"
        );
    }

    #[test]
    fn test_init_config_file_missing_template() {
        let dir = TempDir::new().unwrap();
        let context = Context::current(Some(dir.path())).unwrap();

        let err = init_config_file(&Config::default(), &context).unwrap_err();
        assert!(err.to_string().contains(".env.example"));
    }
}
