//! SSH transport implementation.
//!
//! This module provides [`SshExecutor`], which dispatches remote commands
//! through the system `ssh` binary and file uploads through `scp`.

use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use camino::Utf8Path;
use which::which;

use super::{ExecutionResult, RemoteCommand, RemoteExecutor};
use crate::cluster::RemoteHost;

/// Remote executor backed by the system ssh/scp binaries.
///
/// When `dry_run` is true, commands are logged but not executed, and
/// every call returns `Ok(ExecutionResult { status: None })`.
pub struct SshExecutor {
    pub dry_run: bool,
}

impl SshExecutor {
    fn spawn_and_wait(&self, program: &str, args: &[String]) -> Result<ExecutionResult> {
        let binary =
            which(program).with_context(|| format!("command not found: {}", program))?;
        tracing::trace!("command found: {}: {}", program, binary.to_string_lossy());

        let output = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn {} with args {:?}", program, args))?;

        if !output.stdout.is_empty() {
            tracing::debug!("{} stdout: {}", program, String::from_utf8_lossy(&output.stdout));
        }
        if !output.stderr.is_empty() {
            tracing::debug!("{} stderr: {}", program, String::from_utf8_lossy(&output.stderr));
        }
        tracing::trace!("executed {}: success={}", program, output.status.success());

        Ok(ExecutionResult {
            status: Some(output.status),
        })
    }
}

impl RemoteExecutor for SshExecutor {
    fn run(&self, host: &RemoteHost, command: &RemoteCommand) -> Result<ExecutionResult> {
        if self.dry_run {
            tracing::info!("dry run: {}: {}", host.name, command.display());
            return Ok(ExecutionResult { status: None });
        }

        // Arguments are joined by the remote shell, so globs in e.g.
        // cleanup commands expand on the remote side.
        let mut args = vec!["-o".to_string(), "BatchMode=yes".to_string(), host.ssh_target()];
        args.extend(command.args.iter().cloned());

        tracing::debug!("running on {}: {}", host.name, command.display());
        self.spawn_and_wait("ssh", &args)
    }

    fn put_file(
        &self,
        host: &RemoteHost,
        local: &Utf8Path,
        remote: &Utf8Path,
    ) -> Result<ExecutionResult> {
        if self.dry_run {
            tracing::info!("dry run: copy {} to {}:{}", local, host.name, remote);
            return Ok(ExecutionResult { status: None });
        }

        let args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            local.to_string(),
            format!("{}:{}", host.ssh_target(), remote),
        ];

        tracing::debug!("copying {} to {}:{}", local, host.name, remote);
        self.spawn_and_wait("scp", &args)
    }
}
