//! Scoop adapter.
//!
//! Scoop has no structured error channel, so "already installed" and "not
//! installed" are recognised by matching the text it prints. This is a
//! best-effort classifier: a localized or reworded message degrades to a
//! plain [`PackageManagerError::Execution`].

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

use super::{
    ExecContext, InstalledPackage, ManagerKind, PackageManager, PackageManagerError,
    ProcessOutput, ProcessRunner, TokioProcessRunner, command_line,
};

const DEFAULT_EXECUTABLE: &str = "scoop";
const ALREADY_INSTALLED: &str = "is already installed";
const NOT_INSTALLED: &str = "is not installed";

pub struct ScoopManager<P: ProcessRunner = TokioProcessRunner> {
    executable: PathBuf,
    runner: P,
}

impl ScoopManager<TokioProcessRunner> {
    /// Create an adapter for the given executable; an empty path means `scoop` on PATH.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self::with_runner(executable, TokioProcessRunner)
    }
}

impl<P: ProcessRunner> ScoopManager<P> {
    pub fn with_runner(executable: impl Into<PathBuf>, runner: P) -> Self {
        let executable = executable.into();
        let executable = if executable.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_EXECUTABLE)
        } else {
            executable
        };
        Self { executable, runner }
    }

    #[cfg(test)]
    fn executable(&self) -> &std::path::Path {
        &self.executable
    }

    async fn run(
        &self,
        ctx: &ExecContext,
        args: &[String],
    ) -> Result<ProcessOutput, PackageManagerError> {
        self.runner.run(ctx, &self.executable, args).await
    }
}

#[async_trait]
impl<P: ProcessRunner> PackageManager for ScoopManager<P> {
    fn kind(&self) -> ManagerKind {
        ManagerKind::Scoop
    }

    async fn install(
        &self,
        ctx: &ExecContext,
        name: &str,
        version: &str,
    ) -> Result<(), PackageManagerError> {
        let target = if version.is_empty() {
            name.to_string()
        } else {
            format!("{}@{}", name, version)
        };
        let args = vec!["install".to_string(), target];
        let output = self.run(ctx, &args).await?;

        if output.success {
            return Ok(());
        }
        if output.mentions(ALREADY_INSTALLED) {
            debug!("scoop reports {} as already installed", name);
            return Err(PackageManagerError::AlreadyInstalled(name.to_string()));
        }
        Err(output.into_error(command_line(&self.executable, &args)))
    }

    async fn uninstall(&self, ctx: &ExecContext, name: &str) -> Result<(), PackageManagerError> {
        let args = vec!["uninstall".to_string(), name.to_string()];
        let output = self.run(ctx, &args).await?;

        if output.success {
            return Ok(());
        }
        if output.mentions(NOT_INSTALLED) {
            debug!("scoop reports {} as not installed", name);
            return Err(PackageManagerError::NotInstalled(name.to_string()));
        }
        Err(output.into_error(command_line(&self.executable, &args)))
    }

    async fn list(&self, ctx: &ExecContext) -> Result<Vec<InstalledPackage>, PackageManagerError> {
        let args = vec!["export".to_string()];
        let output = self.run(ctx, &args).await?;
        let command = command_line(&self.executable, &args);

        if !output.success {
            return Err(output.into_error(command));
        }
        parse_export(&output.stdout)
            .map_err(|reason| PackageManagerError::InvalidOutput { command, reason })
    }
}

#[derive(Deserialize)]
struct ExportOutput {
    #[serde(default, alias = "Apps")]
    apps: Vec<ExportedApp>,
}

// Older scoop versions emit lowercase keys, newer ones PascalCase.
#[derive(Deserialize)]
struct ExportedApp {
    #[serde(default, alias = "Name")]
    name: String,
    #[serde(default, alias = "Version")]
    version: String,
    #[serde(default, alias = "Description", alias = "Info")]
    description: String,
}

/// Parse `scoop export` output: JSON when it looks like JSON, otherwise the
/// legacy one-app-per-line `name version [bucket]` format.
fn parse_export(stdout: &str) -> Result<Vec<InstalledPackage>, String> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('{') {
        let output: ExportOutput = serde_json::from_str(trimmed).map_err(|e| e.to_string())?;
        return Ok(output
            .apps
            .into_iter()
            .filter(|app| !app.name.is_empty())
            .map(|app| InstalledPackage {
                name: app.name,
                version: app.version,
                description: app.description,
                source: ManagerKind::Scoop.to_string(),
            })
            .collect());
    }

    let mut packages = Vec::new();
    for line in trimmed.lines() {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(version)) = (fields.next(), fields.next()) else {
            debug!("Ignoring scoop export line: {:?}", line);
            continue;
        };
        packages.push(InstalledPackage::new(name, version, ManagerKind::Scoop));
    }
    if packages.is_empty() {
        return Err(format!("no packages recognised in output: {}", trimmed));
    }
    Ok(packages)
}
