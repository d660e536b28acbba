//! devctl configuration.
//!
//! Two layers live here:
//!
//! - [`Settings`]: where devctl keeps its files and whether debug output is
//!   on. Resolved from built-in defaults, then environment and CLI flags
//!   (both handled by clap), never persisted.
//! - [`Config`]: the persisted `devctl.json` with the detected package
//!   managers and the packages devctl has ensured are installed.

mod store;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::runtime::Runtime;

pub use store::{Config, ConfigStore, ManagerRegistration, PackageRecord, merge_packages};

pub const APP_NAME: &str = "devctl";

/// Values supplied from the command line or environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub debug: bool,
    pub data_dir: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub debug: bool,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Settings {
    /// Fill in everything not overridden with the defaults under the home directory:
    /// `~/.devctl` for data and `~/.config/devctl` for configuration.
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(runtime: &R, overrides: SettingsOverrides) -> Result<Self> {
        let home = || {
            runtime
                .home_dir()
                .context("Could not find home directory")
        };

        let data_dir = match overrides.data_dir {
            Some(dir) => dir,
            None => home()?.join(format!(".{}", APP_NAME)),
        };
        let config_dir = match overrides.config_dir {
            Some(dir) => dir,
            None => home()?.join(".config").join(APP_NAME),
        };

        Ok(Self {
            debug: overrides.debug,
            data_dir,
            config_dir,
        })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(format!("{}.json", APP_NAME))
    }

    /// Default `env_logger` filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "warn" }
    }
}
