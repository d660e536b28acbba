//! Reconciliation: converge installed packages toward a manifest.
//!
//! Packages are processed one at a time in manifest order. For each one the
//! reconciler decides between skipping, installing and reinstalling
//! (uninstall + install) and records the outcome. Per-package errors never
//! abort the batch; they become [`Outcome::Failed`].

use log::{debug, info, warn};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::package::{DesiredPackage, version};
use crate::pkgmgr::{
    ExecContext, InstalledPackage, ManagerRegistry, PackageManager, PackageManagerError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry is missing a required field.
    Invalid(String),
    /// Installed version already equals the desired one.
    AlreadySatisfied,
    /// The package manager refused to install because the package is present.
    AlreadyInstalled,
    ManagerNotConfigured(String),
    /// The run was cancelled before this package was reached.
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Invalid(reason) => write!(f, "invalid: {}", reason),
            SkipReason::AlreadySatisfied => f.write_str("already satisfied"),
            SkipReason::AlreadyInstalled => f.write_str("already installed"),
            SkipReason::ManagerNotConfigured(id) => {
                write!(f, "package manager '{}' not configured", id)
            }
            SkipReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Installed,
    /// Uninstalled version `from`, then installed the desired one.
    Reinstalled { from: String },
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Installed => f.write_str("installed"),
            Action::Reinstalled { from } if from.is_empty() => f.write_str("reinstalled"),
            Action::Reinstalled { from } => write!(f, "reinstalled (was {})", from),
        }
    }
}

/// Step at which a package failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    List,
    Uninstall,
    Install,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::List => "list packages",
            Stage::Uninstall => "uninstall",
            Stage::Install => "install",
        })
    }
}

#[derive(Debug)]
pub struct PackageFailure {
    pub stage: Stage,
    pub error: PackageManagerError,
}

impl fmt::Display for PackageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {}: {}", self.stage, self.error)
    }
}

#[derive(Debug)]
pub enum Outcome {
    Skipped(SkipReason),
    Succeeded(Action),
    Failed(PackageFailure),
}

impl Outcome {
    /// Whether devctl can now vouch for the package being installed.
    pub fn is_managed(&self) -> bool {
        matches!(
            self,
            Outcome::Succeeded(_)
                | Outcome::Skipped(SkipReason::AlreadySatisfied)
                | Outcome::Skipped(SkipReason::AlreadyInstalled)
        )
    }

    fn failed(stage: Stage, error: PackageManagerError) -> Self {
        Outcome::Failed(PackageFailure { stage, error })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped(reason) => write!(f, "skipped: {}", reason),
            Outcome::Succeeded(action) => write!(f, "{}", action),
            Outcome::Failed(failure) => write!(f, "{}", failure),
        }
    }
}

#[derive(Debug)]
pub struct PackageResult {
    pub package: DesiredPackage,
    pub outcome: Outcome,
}

/// Per-package outcomes of one run, in manifest order.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub results: Vec<PackageResult>,
}

impl ReconcileReport {
    /// Packages to merge into the persisted managed set.
    pub fn managed(&self) -> Vec<DesiredPackage> {
        self.results
            .iter()
            .filter(|r| r.outcome.is_managed())
            .map(|r| r.package.clone())
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Succeeded(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Receives progress events. Presentation only; it cannot influence outcomes.
pub trait ReconcileObserver: Send + Sync {
    fn on_begin(&self, _total: usize) {}
    fn on_start(&self, _index: usize, _package: &DesiredPackage) {}
    fn on_finish(&self, _index: usize, _package: &DesiredPackage, _outcome: &Outcome) {}
}

pub struct NoopObserver;

impl ReconcileObserver for NoopObserver {}

static NOOP_OBSERVER: NoopObserver = NoopObserver;

pub struct Reconciler<'a> {
    registry: &'a ManagerRegistry,
    observer: &'a dyn ReconcileObserver,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a ManagerRegistry) -> Self {
        Self {
            registry,
            observer: &NOOP_OBSERVER,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn ReconcileObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Process `packages` in order and report what happened to each.
    ///
    /// Each manager is listed at most once per run; the cached list is kept
    /// up to date with what this run installs, so a name repeated later in
    /// the same manifest sees the new state.
    #[tracing::instrument(skip_all, fields(packages = packages.len()))]
    pub async fn reconcile(
        &self,
        ctx: &ExecContext,
        packages: &[DesiredPackage],
    ) -> ReconcileReport {
        let mut installed: HashMap<String, Vec<InstalledPackage>> = HashMap::new();
        let mut report = ReconcileReport {
            results: Vec::with_capacity(packages.len()),
        };

        self.observer.on_begin(packages.len());
        for (index, package) in packages.iter().enumerate() {
            self.observer.on_start(index, package);

            let outcome = if ctx.is_cancelled() {
                Outcome::Skipped(SkipReason::Cancelled)
            } else {
                self.reconcile_one(ctx, package, &mut installed).await
            };

            match &outcome {
                Outcome::Failed(failure) => warn!("{}: {}", package, failure),
                other => info!("{}: {}", package, other),
            }
            self.observer.on_finish(index, package, &outcome);

            report.results.push(PackageResult {
                package: package.clone(),
                outcome,
            });
        }

        report
    }

    async fn reconcile_one(
        &self,
        ctx: &ExecContext,
        package: &DesiredPackage,
        cache: &mut HashMap<String, Vec<InstalledPackage>>,
    ) -> Outcome {
        if let Err(e) = package.validate() {
            return Outcome::Skipped(SkipReason::Invalid(e.to_string()));
        }

        let Some(manager) = self.registry.get(&package.manager) else {
            return Outcome::Skipped(SkipReason::ManagerNotConfigured(package.manager.clone()));
        };

        let installed = match cache.entry(package.manager.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => match manager.list(ctx).await {
                Ok(list) => {
                    debug!("{} reports {} installed packages", package.manager, list.len());
                    entry.insert(list)
                }
                Err(error) => return Outcome::failed(Stage::List, error),
            },
        };

        let current = installed
            .iter()
            .find(|p| p.name == package.name)
            .map(|p| p.version.clone());

        match current {
            Some(current) if version::equal(&current, &package.version) => {
                Outcome::Skipped(SkipReason::AlreadySatisfied)
            }
            Some(current) => {
                debug!(
                    "{} is at {}, reinstalling {}",
                    package.name, current, package.version
                );
                match manager.uninstall(ctx, &package.name).await {
                    Ok(()) => {}
                    Err(PackageManagerError::NotInstalled(_)) => {
                        debug!("{} was already gone", package.name);
                    }
                    Err(error) => return Outcome::failed(Stage::Uninstall, error),
                }
                installed.retain(|p| p.name != package.name);
                install(
                    ctx,
                    manager.as_ref(),
                    package,
                    installed,
                    Action::Reinstalled { from: current },
                )
                .await
            }
            None => install(ctx, manager.as_ref(), package, installed, Action::Installed).await,
        }
    }
}

async fn install(
    ctx: &ExecContext,
    manager: &dyn PackageManager,
    package: &DesiredPackage,
    installed: &mut Vec<InstalledPackage>,
    action: Action,
) -> Outcome {
    match manager
        .install(ctx, &package.name, &package.version)
        .await
    {
        Ok(()) => {
            installed.push(InstalledPackage {
                name: package.name.clone(),
                version: package.version.clone(),
                description: String::new(),
                source: package.manager.clone(),
            });
            Outcome::Succeeded(action)
        }
        Err(PackageManagerError::AlreadyInstalled(_)) => {
            Outcome::Skipped(SkipReason::AlreadyInstalled)
        }
        Err(error) => Outcome::failed(Stage::Install, error),
    }
}
