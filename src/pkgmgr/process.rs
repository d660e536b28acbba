use async_trait::async_trait;
use log::debug;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{ExecContext, PackageManagerError};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub status: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether `needle` appears in either output stream, case-insensitively.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.stderr.to_lowercase().contains(&needle) || self.stdout.to_lowercase().contains(&needle)
    }

    pub fn into_error(self, command: String) -> PackageManagerError {
        PackageManagerError::Execution {
            command,
            status: self.status,
            stderr: self.stderr,
        }
    }
}

/// Runs external programs under an [`ExecContext`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(
        &self,
        ctx: &ExecContext,
        program: &Path,
        args: &[String],
    ) -> Result<ProcessOutput, PackageManagerError>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
///
/// The child is killed when the context is cancelled or its timeout elapses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    #[tracing::instrument(skip(self, ctx))]
    async fn run(
        &self,
        ctx: &ExecContext,
        program: &Path,
        args: &[String],
    ) -> Result<ProcessOutput, PackageManagerError> {
        let command = command_line(program, args);

        if ctx.is_cancelled() {
            return Err(PackageManagerError::Cancelled { command });
        }

        debug!("Running: {}", command);
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PackageManagerError::Spawn {
                command: command.clone(),
                source,
            })?;

        let deadline = async {
            match ctx.timeout() {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        // Dropping the `wait_with_output` future drops the child, and
        // kill_on_drop terminates it.
        let output = tokio::select! {
            result = child.wait_with_output() => result.map_err(|source| PackageManagerError::Spawn {
                command: command.clone(),
                source,
            })?,
            _ = ctx.token().cancelled() => {
                debug!("Cancelled: {}", command);
                return Err(PackageManagerError::Cancelled { command });
            }
            _ = deadline => {
                let timeout = ctx.timeout().unwrap_or_default();
                debug!("Timed out after {:?}: {}", timeout, command);
                return Err(PackageManagerError::TimedOut { command, timeout });
            }
        };

        let result = ProcessOutput {
            status: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("{} exited with {:?}", command, result.status);
        Ok(result)
    }
}

/// Human readable form of a command, used in errors and logs.
pub fn command_line(program: &Path, args: &[String]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
