//! Idempotent config file initialization
//!
//! Copies the template (e.g. `.env.example`) to the config file (e.g.
//! `.env`) when the config file is absent. An existing config file is never
//! read or modified.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::EnvError;

/// Outcome of [`ensure_config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigInit {
    /// The config file was already there
    Existed,
    /// The config file was created from the template
    Created,
}

impl std::fmt::Display for ConfigInit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigInit::Existed => write!(f, "exists"),
            ConfigInit::Created => write!(f, "created"),
        }
    }
}

/// Create `target` as a verbatim copy of `template` unless it exists
///
/// The target is opened create-new, so a file that appears between the
/// existence check and the write is left alone and reported as `Existed`.
///
/// # Errors
/// * `EnvError::TemplateMissing` - target is absent and so is the template
/// * `EnvError::Io` - reading the template or writing the target failed
pub fn ensure_config(template: &Path, target: &Path) -> Result<ConfigInit, EnvError> {
    if target.exists() {
        tracing::debug!("Config file present: {}", target.display());
        return Ok(ConfigInit::Existed);
    }

    let contents = match fs::read(template) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(EnvError::TemplateMissing {
                path: template.display().to_string(),
            });
        }
        Err(e) => return Err(EnvError::Io(e)),
    };

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(ConfigInit::Existed),
        Err(e) => return Err(EnvError::Io(e)),
    };
    file.write_all(&contents)?;
    file.sync_all()?;

    tracing::info!(
        "Created {} from {}",
        target.display(),
        template.display()
    );
    Ok(ConfigInit::Created)
}
