use std::time::Duration;
use thiserror::Error;

/// Errors reported by package manager adapters.
///
/// `AlreadyInstalled` and `NotInstalled` are expected conditions recognised
/// from the tool's output; the caller decides whether they matter.
/// `Cancelled` and `TimedOut` mean the process was terminated by devctl.
#[derive(Debug, Error)]
pub enum PackageManagerError {
    #[error("package '{0}' is already installed")]
    AlreadyInstalled(String),

    #[error("package '{0}' is not installed")]
    NotInstalled(String),

    #[error("command failed: {command}: {}", describe_failure(.status, .stderr))]
    Execution {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command cancelled: {command}")]
    Cancelled { command: String },

    #[error("command timed out after {}s: {command}", .timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },

    #[error("unexpected output from {command}: {reason}")]
    InvalidOutput { command: String, reason: String },
}

impl PackageManagerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PackageManagerError::Cancelled { .. })
    }
}

fn describe_failure(status: &Option<i32>, stderr: &str) -> String {
    let status = match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{}\nstderr: {}", status, stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_includes_stderr() {
        let err = PackageManagerError::Execution {
            command: "scoop install git".into(),
            status: Some(1),
            stderr: "Couldn't find manifest for 'git'.\n".into(),
        };
        assert_eq!(
            err.to_string(),
            "command failed: scoop install git: exit status 1\nstderr: Couldn't find manifest for 'git'."
        );
    }

    #[test]
    fn test_execution_error_without_stderr() {
        let err = PackageManagerError::Execution {
            command: "scoop export".into(),
            status: None,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "command failed: scoop export: terminated by signal"
        );
    }

    #[test]
    fn test_cancellation_is_distinct() {
        let cancelled = PackageManagerError::Cancelled {
            command: "scoop install git".into(),
        };
        let timed_out = PackageManagerError::TimedOut {
            command: "scoop install git".into(),
            timeout: Duration::from_secs(5),
        };
        assert!(cancelled.is_cancelled());
        assert!(!timed_out.is_cancelled());
        assert_eq!(
            timed_out.to_string(),
            "command timed out after 5s: scoop install git"
        );
    }
}
