//! Error types for taskenv
//!
//! Fatal errors (config initialization, bad settings, template references)
//! abort the command. Command errors are recovered into declared fallbacks
//! by the resolver and only show up in debug logs.

use serde::Serialize;
use thiserror::Error;

/// Main error type for environment resolution
#[derive(Error, Debug)]
pub enum EnvError {
    /// Config template to copy from does not exist
    #[error("Config template not found: {path}")]
    TemplateMissing { path: String },

    /// Timezone setting is not a known IANA name
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A template references a variable that is not resolved yet
    #[error("Variable '{name}' references unknown variable '{reference}'")]
    UnknownReference { name: String, reference: String },

    /// Lookup of a variable that is not part of the environment
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Failed to spawn the command
    #[error("Failed to spawn command: {command}")]
    SpawnFailed { command: String, error: String },

    /// Command exited with a non-zero status
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
        hint: Option<String>,
    },

    /// Command timed out
    #[error("Command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnvError {
    /// Whether this error comes from running an external command.
    ///
    /// Command errors are recoverable: the resolver replaces them with the
    /// variable's fallback.
    pub fn is_command_error(&self) -> bool {
        matches!(
            self,
            EnvError::SpawnFailed { .. }
                | EnvError::CommandFailed { .. }
                | EnvError::Timeout { .. }
        )
    }
}

/// Serializable error info for `--format json` output
#[derive(Debug, Serialize, Clone)]
pub struct ErrorInfo {
    pub message: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl From<&EnvError> for ErrorInfo {
    fn from(err: &EnvError) -> Self {
        let (error_type, hint, exit_code) = match err {
            EnvError::TemplateMissing { path } => (
                "template_missing",
                Some(format!("Create {} or point [dotenv].template at an existing file", path)),
                None,
            ),
            EnvError::InvalidTimezone(_) => (
                "invalid_timezone",
                Some("Use an IANA timezone name such as 'Asia/Shanghai' or 'UTC'".to_string()),
                None,
            ),
            EnvError::Config(_) => (
                "config_error",
                Some("Check your taskenv configuration file".to_string()),
                None,
            ),
            EnvError::UnknownReference { .. } => (
                "unknown_reference",
                Some("Templates may only reference variables declared before them".to_string()),
                None,
            ),
            EnvError::UnknownVariable(_) => (
                "unknown_variable",
                Some("Run 'taskenv env' to see all variable names".to_string()),
                None,
            ),
            EnvError::SpawnFailed { error, .. } => (
                "spawn_failed",
                Some(format!("Check if the command exists: {}", error)),
                None,
            ),
            EnvError::CommandFailed {
                exit_code, hint, ..
            } => ("command_failed", hint.clone(), *exit_code),
            EnvError::Timeout { .. } => (
                "timeout",
                Some("Increase [exec].timeout_secs".to_string()),
                None,
            ),
            EnvError::Io(_) => ("io_error", None, None),
        };

        ErrorInfo {
            message: err.to_string(),
            error_type: error_type.to_string(),
            hint,
            exit_code,
        }
    }
}

/// Suggest an explanation for common git/shell failure output
pub fn suggest_fix(command: &str, stderr: &str) -> Option<String> {
    if stderr.contains("not a git repository") {
        return Some("Not inside a git repository; git variables use their defaults.".to_string());
    }

    if stderr.contains("No such remote") {
        return Some(format!(
            "Remote is not configured. Add one with 'git remote add origin <url>'. ({})",
            command
        ));
    }

    if stderr.contains("unknown revision") || stderr.contains("ambiguous argument 'HEAD'") {
        return Some("Repository has no commits yet.".to_string());
    }

    if stderr.contains("Please tell me who you are") || stderr.contains("empty ident") {
        return Some(
            "Annotated tags need a git identity. Set user.name and user.email.".to_string(),
        );
    }

    if stderr.contains("already exists") && command.contains("tag") {
        return Some("Tag already exists.".to_string());
    }

    if stderr.contains("Permission denied") {
        return Some(
            "Permission denied. Check file permissions or run with appropriate access.".to_string(),
        );
    }

    if stderr.contains("command not found") || stderr.contains("not found") {
        return Some("Required command not found. Check PATH and dependencies.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_missing_error() {
        let err = EnvError::TemplateMissing {
            path: ".env.example".to_string(),
        };
        assert_eq!(err.to_string(), "Config template not found: .env.example");

        let info = ErrorInfo::from(&err);
        assert_eq!(info.error_type, "template_missing");
        assert!(info.hint.unwrap().contains(".env.example"));
    }

    #[test]
    fn test_unknown_reference_error() {
        let err = EnvError::UnknownReference {
            name: "IMAGE".to_string(),
            reference: "TAG".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Variable 'IMAGE' references unknown variable 'TAG'"
        );
    }

    #[test]
    fn test_command_failed_error() {
        let err = EnvError::CommandFailed {
            command: "git rev-parse --short HEAD".to_string(),
            exit_code: Some(128),
            stderr: "fatal: not a git repository".to_string(),
            hint: suggest_fix("git rev-parse", "fatal: not a git repository"),
        };
        assert_eq!(err.to_string(), "Command failed: git rev-parse --short HEAD");

        let info = ErrorInfo::from(&err);
        assert_eq!(info.exit_code, Some(128));
        assert!(info.hint.is_some());
    }

    #[test]
    fn test_is_command_error() {
        assert!(EnvError::SpawnFailed {
            command: "git tag".to_string(),
            error: "not found".to_string()
        }
        .is_command_error());
        assert!(EnvError::Timeout {
            command: "git fetch".to_string(),
            timeout_secs: 10
        }
        .is_command_error());
        assert!(!EnvError::Config("bad".to_string()).is_command_error());
        assert!(!EnvError::TemplateMissing {
            path: "x".to_string()
        }
        .is_command_error());
    }

    #[test]
    fn test_suggest_fix_not_a_repo() {
        let suggestion = suggest_fix(
            "git rev-parse --abbrev-ref HEAD",
            "fatal: not a git repository (or any of the parent directories): .git",
        );
        assert!(suggestion.unwrap().contains("git repository"));
    }

    #[test]
    fn test_suggest_fix_no_remote() {
        let suggestion = suggest_fix("git remote get-url origin", "error: No such remote 'origin'");
        assert!(suggestion.unwrap().contains("git remote add"));
    }

    #[test]
    fn test_suggest_fix_no_commits() {
        let suggestion = suggest_fix(
            "git rev-parse --short HEAD",
            "fatal: ambiguous argument 'HEAD': unknown revision or path not in the working tree.",
        );
        assert!(suggestion.unwrap().contains("no commits"));
    }

    #[test]
    fn test_suggest_fix_identity() {
        let suggestion = suggest_fix("git tag -a v0.0.0 -m init", "*** Please tell me who you are.");
        assert!(suggestion.unwrap().contains("user.email"));
    }

    #[test]
    fn test_suggest_fix_no_match() {
        let suggestion = suggest_fix("some command", "some random error");
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_error_info_skips_empty_fields() {
        let info = ErrorInfo::from(&EnvError::Io(std::io::Error::other("disk full")));

        let json = serde_json::to_string(&info).unwrap();
        assert!(json.contains("io_error"));
        assert!(!json.contains("hint"));
        assert!(!json.contains("exit_code"));
    }
}
