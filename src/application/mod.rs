//! Application layer - use cases that coordinate the package model, the
//! package manager adapters and the persisted configuration.
//!
//! The command layer parses arguments and prints; everything with a decision
//! in it lives here.

mod export;
mod import;
mod init;
pub mod reconcile;

pub use export::{ExportOutcome, ExportTarget, ExportUseCase};
pub use import::{ImportOptions, ImportOutcome, ImportUseCase};
pub use init::{InitReport, InitUseCase};
pub use reconcile::{
    Action, NoopObserver, Outcome, PackageFailure, PackageResult, ReconcileObserver,
    ReconcileReport, Reconciler, SkipReason, Stage,
};
