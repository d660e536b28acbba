//! Export use case - write the managed packages as a manifest.

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use crate::config::ConfigStore;
use crate::package::{Manifest, default_export_file_name};
use crate::pkgmgr::Platform;
use crate::runtime::Runtime;

/// Where `export` writes the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Default file name in the current directory.
    CurrentDir,
    /// Default file name in this directory.
    Directory(PathBuf),
    File(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    NothingToExport,
    /// The target exists and the user chose not to overwrite it.
    Declined(PathBuf),
    Written { path: PathBuf, count: usize },
}

pub struct ExportUseCase<'a, R: Runtime> {
    runtime: &'a R,
    store: &'a ConfigStore<'a, R>,
    platform: Platform,
}

impl<'a, R: Runtime> ExportUseCase<'a, R> {
    pub fn new(runtime: &'a R, store: &'a ConfigStore<'a, R>, platform: Platform) -> Self {
        Self {
            runtime,
            store,
            platform,
        }
    }

    pub fn resolve_path(&self, target: &ExportTarget) -> Result<PathBuf> {
        let file_name = default_export_file_name(self.platform);
        Ok(match target {
            ExportTarget::CurrentDir => self.runtime.current_dir()?.join(file_name),
            ExportTarget::Directory(dir) => dir.join(file_name),
            ExportTarget::File(path) => path.clone(),
        })
    }

    /// Write the manifest. An existing file is only replaced when `overwrite`
    /// is set or the user confirms.
    #[tracing::instrument(skip(self))]
    pub fn execute(&self, target: &ExportTarget, overwrite: bool) -> Result<ExportOutcome> {
        let config = self.store.load()?;
        let manifest = Manifest::for_export(self.platform, config.packages);
        if manifest.packages.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }

        let path = self.resolve_path(target)?;
        if !overwrite
            && self.runtime.exists(&path)
            && !self
                .runtime
                .confirm(&format!("{} already exists. Overwrite?", path.display()))?
        {
            return Ok(ExportOutcome::Declined(path));
        }

        manifest.save(self.runtime, &path)?;
        info!("Exported {} packages to {}", manifest.packages.len(), path.display());

        Ok(ExportOutcome::Written {
            path,
            count: manifest.packages.len(),
        })
    }
}
