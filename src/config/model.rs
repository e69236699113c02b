//! Configuration model for taskenv
//!
//! Defines the structure for XDG-compliant layered configuration.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Value of NAMESPACE
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Value of DEVELOPER
    #[serde(default = "default_developer")]
    pub developer: String,

    /// IANA timezone used to render TIME_NOW
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Local config file initialization
    #[serde(default)]
    pub dotenv: DotenvConfig,

    /// Git lookups and fallbacks
    #[serde(default)]
    pub git: GitConfig,

    /// External command execution
    #[serde(default)]
    pub exec: ExecConfig,

    /// Extra variables appended after the built-in ones
    #[serde(default)]
    pub vars: Vec<CustomVar>,
}

fn default_namespace() -> String {
    "fastmcp-study".to_string()
}

fn default_developer() -> String {
    "https://github.com/fastmcp-study".to_string()
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            developer: default_developer(),
            timezone: default_timezone(),
            dotenv: DotenvConfig::default(),
            git: GitConfig::default(),
            exec: ExecConfig::default(),
            vars: Vec::new(),
        }
    }
}

/// Template → config file initialization
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DotenvConfig {
    /// Run the initialization at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// File copied when the target is absent (relative to the project dir)
    #[serde(default = "default_template")]
    pub template: String,

    /// Config file to create (relative to the project dir)
    #[serde(default = "default_target")]
    pub target: String,
}

fn default_true() -> bool {
    true
}

fn default_template() -> String {
    ".env.example".to_string()
}

fn default_target() -> String {
    ".env".to_string()
}

impl Default for DotenvConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            template: default_template(),
            target: default_target(),
        }
    }
}

/// Git lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitConfig {
    /// Git executable
    #[serde(default = "default_git_command")]
    pub command: String,

    /// Remote used for GIT_SOURCE and GIT_PROJECT
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Create the initial tag when the repository has none
    #[serde(default)]
    pub create_missing_tag: bool,

    /// Tag used (and optionally created) when no tags exist
    #[serde(default = "default_initial_tag")]
    pub initial_tag: String,

    /// Annotation message of the created tag
    #[serde(default = "default_initial_tag_message")]
    pub initial_tag_message: String,

    /// GIT_BRANCH fallback
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// GIT_COMMIT fallback
    #[serde(default = "default_commit")]
    pub default_commit: String,
}

fn default_git_command() -> String {
    "git".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_initial_tag() -> String {
    "v0.0.0".to_string()
}

fn default_initial_tag_message() -> String {
    "init".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_commit() -> String {
    "0000".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            command: default_git_command(),
            remote: default_remote(),
            create_missing_tag: false,
            initial_tag: default_initial_tag(),
            initial_tag_message: default_initial_tag_message(),
            default_branch: default_branch(),
            default_commit: default_commit(),
        }
    }
}

/// External command execution settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecConfig {
    /// Per-command timeout in seconds (0 for no timeout)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Shell used for `sh = "..."` custom variables
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_timeout() -> u64 {
    10
}

fn default_shell() -> String {
    "sh".to_string()
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            shell: default_shell(),
        }
    }
}

/// User-defined variable
///
/// Exactly one of `value` (a literal template) or `sh` (a shell command)
/// must be set.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct CustomVar {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sh: Option<String>,

    /// Used when `sh` fails or prints nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}
