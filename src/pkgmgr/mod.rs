//! Package manager adapters.
//!
//! A [`PackageManager`] wraps one real package manager CLI and exposes the
//! three operations reconciliation needs: install, uninstall and list. Each
//! adapter classifies the tool's output into [`PackageManagerError`] so the
//! reconciler never has to look at raw stderr text.

mod context;
mod detect;
mod error;
mod factory;
mod guide;
mod platform;
mod process;
mod registry;
mod scoop;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use context::ExecContext;
pub use detect::{Detection, detect_managers};
pub use error::PackageManagerError;
pub use factory::{build_manager, build_registry};
pub use guide::{InstallGuide, install_guide};
pub use platform::Platform;
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner, command_line};
pub use registry::ManagerRegistry;
pub use scoop::ScoopManager;

#[cfg(test)]
pub use process::MockProcessRunner;

/// A package as reported by a package manager's list/export command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
    pub description: String,
    /// Manager the package came from (e.g. "scoop").
    pub source: String,
}

impl InstalledPackage {
    pub fn new(name: impl Into<String>, version: impl Into<String>, source: ManagerKind) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            source: source.to_string(),
        }
    }
}

/// Package managers devctl knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    Scoop,
    Pwsh,
    Brew,
    Apt,
}

impl ManagerKind {
    pub const ALL: [ManagerKind; 4] = [
        ManagerKind::Scoop,
        ManagerKind::Pwsh,
        ManagerKind::Brew,
        ManagerKind::Apt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerKind::Scoop => "scoop",
            ManagerKind::Pwsh => "pwsh",
            ManagerKind::Brew => "brew",
            ManagerKind::Apt => "apt",
        }
    }

    /// Name of the executable looked up on PATH during detection.
    pub fn executable_name(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ManagerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManagerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown package manager: {}", s))
    }
}

/// Install, uninstall and list packages through one package manager.
///
/// All operations are bounded by the given [`ExecContext`]: cancelling it (or
/// hitting its timeout) terminates the underlying process and surfaces
/// [`PackageManagerError::Cancelled`] / [`PackageManagerError::TimedOut`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    fn kind(&self) -> ManagerKind;

    /// Install `name`, pinned to `version` unless it is empty.
    ///
    /// Returns [`PackageManagerError::AlreadyInstalled`] when the tool reports
    /// the package as present.
    async fn install(
        &self,
        ctx: &ExecContext,
        name: &str,
        version: &str,
    ) -> Result<(), PackageManagerError>;

    /// Uninstall `name`.
    ///
    /// Returns [`PackageManagerError::NotInstalled`] when the tool reports the
    /// package as absent.
    async fn uninstall(&self, ctx: &ExecContext, name: &str) -> Result<(), PackageManagerError>;

    /// List installed packages. An empty list is a valid answer.
    async fn list(&self, ctx: &ExecContext) -> Result<Vec<InstalledPackage>, PackageManagerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_kind_round_trip() {
        for kind in ManagerKind::ALL {
            assert_eq!(kind.to_string().parse::<ManagerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_manager_kind_rejects_unknown() {
        let err = "chocolatey".parse::<ManagerKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown package manager: chocolatey");
        assert!("Scoop".parse::<ManagerKind>().is_err());
    }

    #[test]
    fn test_manager_kind_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&ManagerKind::Scoop).unwrap(), "\"scoop\"");
        let kind: ManagerKind = serde_json::from_str("\"brew\"").unwrap();
        assert_eq!(kind, ManagerKind::Brew);
    }
}
