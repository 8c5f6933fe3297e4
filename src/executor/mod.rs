//! Remote command execution abstraction.
//!
//! This module provides:
//! - [`RemoteCommand`]: Specification for commands to run on a remote host
//! - [`ExecutionResult`]: Result of command execution
//! - [`RemoteExecutor`]: Trait for the remote execution transport
//! - [`SshExecutor`]: Production implementation using ssh/scp

mod ssh;

use std::process::ExitStatus;

use anyhow::Result;
use camino::Utf8Path;

use crate::cluster::RemoteHost;
use crate::error::ReposetupError;

pub use ssh::SshExecutor;

/// Specification for a command to run on a remote host.
#[derive(Debug, Clone)]
pub struct RemoteCommand {
    /// Command and arguments, passed through to the remote shell.
    pub args: Vec<String>,
}

impl RemoteCommand {
    /// Creates a new RemoteCommand from anything iterable as strings.
    #[must_use]
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Space-joined display form for logs and error messages.
    pub fn display(&self) -> String {
        self.args.join(" ")
    }
}

/// Result of remote command execution.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command (None in dry-run mode).
    pub status: Option<ExitStatus>,
}

impl ExecutionResult {
    /// Returns true if the command executed successfully.
    ///
    /// In dry-run mode (status is None), this always returns true.
    pub fn success(&self) -> bool {
        self.status.is_none_or(|s| s.success())
    }

    /// Returns the exit code if available.
    pub fn code(&self) -> Option<i32> {
        self.status.and_then(|s| s.code())
    }
}

/// Trait for the remote execution transport.
///
/// Implementations must be `Send + Sync` so a single transport can be
/// shared across the per-host fan-out threads.
pub trait RemoteExecutor: Send + Sync {
    /// Runs a command on the given host, returning its result.
    ///
    /// A non-zero exit is reported through [`ExecutionResult`], not as an
    /// `Err`; `Err` is reserved for transport-level failures (ssh binary
    /// missing, spawn failure, etc.).
    fn run(&self, host: &RemoteHost, command: &RemoteCommand) -> Result<ExecutionResult>;

    /// Copies a local file to a path on the given host.
    fn put_file(&self, host: &RemoteHost, local: &Utf8Path, remote: &Utf8Path)
    -> Result<ExecutionResult>;
}

/// Runs a command and converts any failure into a fatal error.
///
/// This is the default check-status behavior used by every setup path;
/// teardown paths call [`RemoteExecutor::run`] directly and ignore the
/// outcome.
pub fn run_checked(
    executor: &dyn RemoteExecutor,
    host: &RemoteHost,
    command: &RemoteCommand,
) -> Result<()> {
    let result = executor.run(host, command)?;
    check_result(host, &command.display(), result)
}

/// Copies a file to a host and converts any failure into a fatal error.
pub fn put_file_checked(
    executor: &dyn RemoteExecutor,
    host: &RemoteHost,
    local: &Utf8Path,
    remote: &Utf8Path,
) -> Result<()> {
    let result = executor.put_file(host, local, remote)?;
    check_result(host, &format!("put_file {} -> {}", local, remote), result)
}

fn check_result(host: &RemoteHost, command: &str, result: ExecutionResult) -> Result<()> {
    if !result.success() {
        let status = result
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown (no status available)".to_string());
        return Err(ReposetupError::Execution {
            host: host.name.clone(),
            command: command.to_string(),
            status,
        }
        .into());
    }
    Ok(())
}
