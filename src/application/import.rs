//! Import use case - reconcile this machine against a manifest file and
//! record the packages devctl now manages.

use std::path::Path;

use anyhow::Result;
use log::info;

use super::reconcile::{ReconcileObserver, ReconcileReport, Reconciler};
use crate::config::{ConfigStore, merge_packages};
use crate::package::Manifest;
use crate::pkgmgr::{ExecContext, ManagerRegistry, Platform};
use crate::runtime::Runtime;

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Abort before touching any package if an entry names a package
    /// manager that is not configured. Otherwise such entries are skipped.
    pub strict: bool,
}

#[derive(Debug)]
pub enum ImportOutcome {
    /// The manifest had no valid entries. Nothing was run or saved.
    NothingToImport,
    Completed(ReconcileReport),
}

pub struct ImportUseCase<'a, R: Runtime> {
    runtime: &'a R,
    store: &'a ConfigStore<'a, R>,
    registry: &'a ManagerRegistry,
    platform: Platform,
}

impl<'a, R: Runtime> ImportUseCase<'a, R> {
    pub fn new(
        runtime: &'a R,
        store: &'a ConfigStore<'a, R>,
        registry: &'a ManagerRegistry,
        platform: Platform,
    ) -> Self {
        Self {
            runtime,
            store,
            registry,
            platform,
        }
    }

    #[tracing::instrument(skip(self, ctx, observer))]
    pub async fn execute(
        &self,
        ctx: &ExecContext,
        manifest_path: &Path,
        options: &ImportOptions,
        observer: &dyn ReconcileObserver,
    ) -> Result<ImportOutcome> {
        // Fail on a broken config file before installing anything.
        let mut config = self.store.load()?;

        let manifest = Manifest::load(self.runtime, manifest_path, self.platform)?;
        let packages = manifest.desired_packages();
        if packages.is_empty() {
            info!("No valid packages in {}", manifest_path.display());
            return Ok(ImportOutcome::NothingToImport);
        }

        if options.strict {
            for package in &packages {
                self.registry.resolve(&package.manager)?;
            }
        }

        let report = Reconciler::new(self.registry)
            .with_observer(observer)
            .reconcile(ctx, &packages)
            .await;

        config.packages = merge_packages(&config.packages, &report.managed());
        self.store.save(&config)?;

        Ok(ImportOutcome::Completed(report))
    }
}
