//! Common test utilities for taskenv tests
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command as StdCommand;

use assert_cmd::Command;
use tempfile::TempDir;

/// Sample `.env.example` content
pub const SAMPLE_TEMPLATE: &str = "PORT=8000\nLOG_LEVEL=info\n";

/// An isolated project directory plus a private HOME
///
/// HOME and XDG_CONFIG_HOME point into `home`, so user-level config and
/// the host's global git config never leak into a test.
pub struct TestProject {
    pub home: TempDir,
    pub dir: TempDir,
}

impl TestProject {
    /// Plain directory, not a repository
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create home dir"),
            dir: TempDir::new().expect("Failed to create project dir"),
        }
    }

    /// Initialized repository with a committer identity
    pub fn with_repo() -> Self {
        let project = Self::new();
        project.git(&["init", "--quiet", "--initial-branch=main"]);
        project.git(&["config", "user.email", "dev@example.com"]);
        project.git(&["config", "user.name", "Dev"]);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    pub fn write_template(&self) -> PathBuf {
        self.write(".env.example", SAMPLE_TEMPLATE)
    }

    /// Run git in the project and return its trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(self.path())
            .envs(self.isolation_env())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Commit a file so HEAD exists
    pub fn commit(&self, message: &str) {
        self.write("README.md", message);
        self.git(&["add", "README.md"]);
        self.git(&["commit", "--quiet", "-m", message]);
    }

    pub fn tag(&self, name: &str) {
        self.git(&["tag", "-a", name, "-m", name]);
    }

    pub fn tags(&self) -> Vec<String> {
        self.git(&["tag", "--list"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// The binary, started in the project directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("taskenv").expect("Failed to find taskenv binary");
        cmd.current_dir(self.path())
            .envs(self.isolation_env())
            .env_remove("RUST_LOG")
            .env_remove("TASKENV_CONFIG")
            .env_remove("TASKENV_NAMESPACE");
        cmd
    }

    fn isolation_env(&self) -> Vec<(&'static str, PathBuf)> {
        let ceiling = self
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        vec![
            ("HOME", self.home.path().to_path_buf()),
            ("XDG_CONFIG_HOME", self.home.path().join(".config")),
            ("GIT_CONFIG_NOSYSTEM", PathBuf::from("1")),
            ("GIT_CEILING_DIRECTORIES", ceiling),
        ]
    }
}

/// Whether git can be spawned on this machine
pub fn git_available() -> bool {
    which::which("git").is_ok()
}
