//! Configuration loader with XDG-compliant path resolution
//!
//! Loads configuration from multiple locations with layered priority:
//! 1. `/etc/taskenv/config.toml` (lowest priority)
//! 2. `~/.config/taskenv/config.toml`
//! 3. `~/.taskenv.toml`
//! 4. `./.taskenv.toml` (highest priority)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use super::model::Config;

/// Application name used for XDG directories
const APP_NAME: &str = "taskenv";

/// Get XDG config search paths in priority order (lowest to highest)
///
/// The project-level file is looked up in `project_dir`.
pub fn config_paths(project_dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. System-wide config (lowest priority)
    paths.push(PathBuf::from(format!("/etc/{}/config.toml", APP_NAME)));

    // 2. XDG config home
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("config.toml"));
    }

    // 3. Home directory
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(format!(".{}.toml", APP_NAME)));
    }

    // 4. Project root (highest priority)
    paths.push(project_dir.join(format!(".{}.toml", APP_NAME)));

    paths
}

/// Load configuration with XDG layering
///
/// Configurations are merged in priority order, with later files
/// overriding earlier ones. Environment variables with prefix
/// `TASKENV_` override all file-based configuration.
///
/// # Arguments
/// * `project_dir` - Directory searched for `.taskenv.toml`
/// * `override_path` - Optional path to a config file that takes highest file priority
pub fn load_config(project_dir: &Path, override_path: Option<&str>) -> Result<Config> {
    let mut figment = Figment::new();

    // Start with defaults
    figment = figment.merge(Serialized::defaults(Config::default()));

    // Layer configs from lowest to highest priority
    for path in config_paths(project_dir) {
        if path.exists() {
            tracing::debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        }
    }

    // Override path takes highest priority (if provided)
    if let Some(path) = override_path {
        let path = PathBuf::from(shellexpand::tilde(path).as_ref());
        if path.exists() {
            tracing::debug!("Loading override config from: {}", path.display());
            figment = figment.merge(Toml::file(&path));
        } else {
            tracing::warn!("Override config not found: {}", path.display());
        }
    }

    // Environment variables override everything
    // Format: TASKENV_GIT__CREATE_MISSING_TAG=true
    // Maps to: git.create_missing_tag = true
    figment = figment.merge(Env::prefixed("TASKENV_").split("__"));

    figment.extract().context("Failed to load configuration")
}

/// Find all existing config files (for `taskenv config`)
pub fn find_config_files(project_dir: &Path) -> Vec<PathBuf> {
    config_paths(project_dir)
        .into_iter()
        .filter(|p| p.exists())
        .collect()
}
