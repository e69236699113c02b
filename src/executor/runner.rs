//! External process execution
//!
//! Commands run with a null stdin, piped output and an optional timeout.
//! Each stream keeps at most `max_output` bytes; the rest is drained and
//! the result flagged as truncated.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::runtime::Runtime;

use crate::error::{suggest_fix, EnvError};

/// Bytes kept per stream
const MAX_OUTPUT: u64 = 64 * 1024;

/// How to run one command
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub working_dir: Option<PathBuf>,
    /// Extra environment, applied on top of the inherited one
    pub env: Vec<(String, String)>,
    /// `None` waits forever
    pub timeout: Option<Duration>,
    pub max_output: u64,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            env: Vec::new(),
            timeout: None,
            max_output: MAX_OUTPUT,
        }
    }
}

impl ExecOptions {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Timeout in seconds, 0 disables it
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// A finished command
#[derive(Debug)]
pub struct ExecResult {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Either stream went over `max_output`
    pub truncated: bool,
    pub duration: Duration,
}

impl ExecResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Trimmed stdout of a successful command
    ///
    /// # Errors
    /// * `EnvError::CommandFailed` - non-zero exit or killed by a signal,
    ///   with a hint derived from stderr
    pub fn into_output(self, command: &str) -> Result<String, EnvError> {
        if !self.success() {
            return Err(EnvError::CommandFailed {
                command: command.to_string(),
                exit_code: self.exit_code,
                hint: suggest_fix(command, &self.stderr),
                stderr: self.stderr.trim().to_string(),
            });
        }
        Ok(self.stdout.trim().to_string())
    }
}

fn display(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `program` to completion
///
/// # Errors
/// * `EnvError::SpawnFailed` - the process could not be started
/// * `EnvError::Timeout` - the timeout elapsed; the child is killed
/// * `EnvError::Io` - reading its output failed
pub async fn exec_command(
    program: &str,
    args: &[&str],
    options: &ExecOptions,
) -> Result<ExecResult, EnvError> {
    let command = display(program, args);
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .envs(options.env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &options.working_dir {
        cmd.current_dir(dir);
    }

    tracing::debug!(command = %command, "Spawning");
    let mut child = cmd.spawn().map_err(|e| EnvError::SpawnFailed {
        command: command.clone(),
        error: e.to_string(),
    })?;

    let collected = match options.timeout {
        Some(limit) => tokio::time::timeout(limit, collect(&mut child, options.max_output))
            .await
            .map_err(|_| EnvError::Timeout {
                command: command.clone(),
                timeout_secs: limit.as_secs(),
            })?,
        None => collect(&mut child, options.max_output).await,
    };
    let (exit_code, (stdout, out_cut), (stderr, err_cut)) = collected?;

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
        truncated: out_cut || err_cut,
        duration: start.elapsed(),
    };
    tracing::debug!(
        command = %command,
        exit_code = ?result.exit_code,
        elapsed_ms = result.duration.as_millis() as u64,
        "Finished"
    );
    Ok(result)
}

type Collected = (Option<i32>, (String, bool), (String, bool));

/// Wait for exit while draining both pipes
async fn collect(child: &mut Child, limit: u64) -> std::io::Result<Collected> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) = tokio::try_join!(
        child.wait(),
        read_bounded(stdout, limit),
        read_bounded(stderr, limit),
    )?;

    Ok((status.code(), stdout, stderr))
}

/// Keep the first `limit` bytes, discard the rest so the child never blocks
async fn read_bounded<R: AsyncRead + Unpin>(
    reader: Option<R>,
    limit: u64,
) -> std::io::Result<(String, bool)> {
    let Some(mut reader) = reader else {
        return Ok((String::new(), false));
    };

    let mut buf = Vec::new();
    (&mut reader).take(limit + 1).read_to_end(&mut buf).await?;
    let truncated = buf.len() as u64 > limit;
    if truncated {
        buf.truncate(limit as usize);
        tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    }

    Ok((String::from_utf8_lossy(&buf).into_owned(), truncated))
}

/// Synchronous front for [`exec_command`]
///
/// Owns a current-thread runtime; resolution itself stays blocking.
pub struct Executor {
    runtime: Runtime,
}

impl Executor {
    pub fn new() -> Result<Self, EnvError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self { runtime })
    }

    pub fn run(
        &self,
        program: &str,
        args: &[&str],
        options: &ExecOptions,
    ) -> Result<ExecResult, EnvError> {
        self.runtime.block_on(exec_command(program, args, options))
    }
}
