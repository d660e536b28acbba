//! Line-based progress output for reconciliation runs.

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::{Outcome, ReconcileObserver, ReconcileReport};
use crate::package::DesiredPackage;

pub struct ProgressPrinter<W: Write + Send> {
    out: Mutex<W>,
    total: AtomicUsize,
}

impl ProgressPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ProgressPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            total: AtomicUsize::new(0),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, line: String) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Progress output is best effort.
        let _ = writeln!(out, "{}", line);
        let _ = out.flush();
    }
}

impl<W: Write + Send> ReconcileObserver for ProgressPrinter<W> {
    fn on_begin(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
    }

    fn on_start(&self, index: usize, package: &DesiredPackage) {
        let total = self.total.load(Ordering::Relaxed);
        self.emit(format!("[{}/{}] {}", index + 1, total, package));
    }

    fn on_finish(&self, _index: usize, _package: &DesiredPackage, outcome: &Outcome) {
        let icon = match outcome {
            Outcome::Succeeded(_) => "✓",
            Outcome::Skipped(_) => "-",
            Outcome::Failed(_) => "✗",
        };
        self.emit(format!("      {} {}", icon, outcome));
    }
}

pub fn summary(report: &ReconcileReport) -> String {
    format!(
        "{} succeeded, {} skipped, {} failed",
        report.succeeded(),
        report.skipped(),
        report.failed()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Action, PackageFailure, PackageResult, SkipReason, Stage};
    use crate::pkgmgr::PackageManagerError;

    fn pkg(name: &str) -> DesiredPackage {
        DesiredPackage::new(name, "1.0.0", "scoop")
    }

    #[test]
    fn test_progress_lines() {
        let printer = ProgressPrinter::new(Vec::new());
        printer.on_begin(2);
        printer.on_start(0, &pkg("git"));
        printer.on_finish(0, &pkg("git"), &Outcome::Succeeded(Action::Installed));
        printer.on_start(1, &pkg("vim"));
        printer.on_finish(
            1,
            &pkg("vim"),
            &Outcome::Failed(PackageFailure {
                stage: Stage::Install,
                error: PackageManagerError::NotInstalled("vim".into()),
            }),
        );

        let output = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(
            output,
            "[1/2] git@1.0.0\n      ✓ installed\n[2/2] vim@1.0.0\n      ✗ failed to install: package 'vim' is not installed\n"
        );
    }

    #[test]
    fn test_summary() {
        let report = ReconcileReport {
            results: vec![
                PackageResult {
                    package: pkg("git"),
                    outcome: Outcome::Succeeded(Action::Installed),
                },
                PackageResult {
                    package: pkg("vim"),
                    outcome: Outcome::Skipped(SkipReason::AlreadySatisfied),
                },
            ],
        };
        assert_eq!(summary(&report), "1 succeeded, 1 skipped, 0 failed");
    }
}
