use anyhow::{Result, bail};
use log::warn;
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::application::{ImportOptions, ImportOutcome, ImportUseCase};
use crate::config::{ConfigStore, Settings};
use crate::pkgmgr::{ExecContext, Platform, build_registry};
use crate::runtime::Runtime;

use super::progress::{ProgressPrinter, summary};

/// Exit status after a second Ctrl-C (128 + SIGINT).
const FORCE_EXIT_CODE: i32 = 130;

/// Install the packages listed in a manifest file
#[tracing::instrument(skip(runtime, settings))]
pub async fn import<R: Runtime>(
    runtime: R,
    settings: &Settings,
    manifest: &Path,
    options: ImportOptions,
    timeout: Option<Duration>,
) -> Result<()> {
    let store = ConfigStore::new(&runtime, &settings.config_dir);
    let registry = build_registry(&store.load()?);

    let token = CancellationToken::new();
    let mut ctx = ExecContext::new().with_token(token.clone());
    if let Some(timeout) = timeout {
        ctx = ctx.with_timeout(timeout);
    }

    let interrupt = tokio::spawn(watch_interrupts(token, tokio::signal::ctrl_c, || {
        std::process::exit(FORCE_EXIT_CODE)
    }));

    let printer = ProgressPrinter::stdout();
    let result = ImportUseCase::new(&runtime, &store, &registry, Platform::current())
        .execute(&ctx, manifest, &options, &printer)
        .await;
    interrupt.abort();

    match result? {
        ImportOutcome::NothingToImport => println!("No valid packages to import"),
        ImportOutcome::Completed(report) => {
            println!();
            println!("{}", summary(&report));
            println!("Configuration saved to: {}", store.path().display());
        }
    }

    if ctx.is_cancelled() {
        bail!("Import interrupted");
    }
    Ok(())
}

/// The first signal cancels `token` so the run winds down and still saves
/// what it managed; the second one calls `force_exit`.
async fn watch_interrupts<S, F>(
    token: CancellationToken,
    mut next_signal: S,
    force_exit: impl FnOnce(),
) where
    S: FnMut() -> F,
    F: Future<Output = io::Result<()>>,
{
    if next_signal().await.is_err() {
        return;
    }
    warn!("Interrupted, cancelling remaining packages (press Ctrl-C again to quit)");
    token.cancel();

    if next_signal().await.is_ok() {
        warn!("Interrupted again, exiting");
        force_exit();
    }
}
