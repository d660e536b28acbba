//! Init use case - detect package managers and record them in the config.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{ConfigStore, ManagerRegistration};
use crate::pkgmgr::{Detection, Platform, detect_managers};
use crate::runtime::Runtime;

#[derive(Debug)]
pub struct InitReport {
    pub platform: Platform,
    /// One entry per manager supported on the platform, installed or not.
    pub detections: Vec<Detection>,
    pub config_path: PathBuf,
}

impl InitReport {
    pub fn missing(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter().filter(|d| !d.is_installed())
    }
}

pub struct InitUseCase<'a, R: Runtime> {
    runtime: &'a R,
    store: &'a ConfigStore<'a, R>,
    platform: Platform,
}

impl<'a, R: Runtime> InitUseCase<'a, R> {
    pub fn new(runtime: &'a R, store: &'a ConfigStore<'a, R>, platform: Platform) -> Self {
        Self {
            runtime,
            store,
            platform,
        }
    }

    /// Replace the registered package managers with the ones found now.
    /// Managed packages are kept.
    #[tracing::instrument(skip(self))]
    pub fn execute(&self, data_dir: &Path) -> Result<InitReport> {
        let detections = detect_managers(self.runtime, self.platform);

        let mut config = self.store.load()?;
        config.data_dir = data_dir.to_path_buf();
        config.package_managers = detections
            .iter()
            .filter_map(|d| {
                d.executable
                    .as_ref()
                    .map(|path| (d.kind.to_string(), ManagerRegistration::new(path.clone())))
            })
            .collect();
        self.store.save(&config)?;

        Ok(InitReport {
            platform: self.platform,
            detections,
            config_path: self.store.path().to_path_buf(),
        })
    }
}
