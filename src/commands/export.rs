use anyhow::Result;

use crate::application::{ExportOutcome, ExportTarget, ExportUseCase};
use crate::config::{ConfigStore, Settings};
use crate::pkgmgr::Platform;
use crate::runtime::Runtime;

/// Write the managed packages to a manifest file
#[tracing::instrument(skip(runtime, settings))]
pub fn export<R: Runtime>(
    runtime: R,
    settings: &Settings,
    target: ExportTarget,
    yes: bool,
) -> Result<()> {
    let store = ConfigStore::new(&runtime, &settings.config_dir);
    let outcome = ExportUseCase::new(&runtime, &store, Platform::current()).execute(&target, yes)?;

    match outcome {
        ExportOutcome::NothingToExport => println!("No valid packages to export"),
        ExportOutcome::Declined(_) => println!("Export cancelled."),
        ExportOutcome::Written { path, .. } => println!("Exported to: {}", path.display()),
    }
    Ok(())
}
