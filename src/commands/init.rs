use anyhow::Result;

use crate::application::{InitReport, InitUseCase};
use crate::config::{ConfigStore, Settings};
use crate::pkgmgr::{Platform, install_guide};
use crate::runtime::Runtime;

/// Detect package managers and record them in the configuration file
#[tracing::instrument(skip(runtime, settings))]
pub fn init<R: Runtime>(runtime: R, settings: &Settings) -> Result<()> {
    let store = ConfigStore::new(&runtime, &settings.config_dir);
    let report = InitUseCase::new(&runtime, &store, Platform::current()).execute(&settings.data_dir)?;

    print_detections(&report);
    for detection in report.missing() {
        print_guide(&report, detection.kind);
    }
    println!();
    println!("Configuration saved to: {}", report.config_path.display());

    Ok(())
}

fn print_detections(report: &InitReport) {
    println!("Package Manager Detection ({})", report.platform);
    println!("{}", "-".repeat(50));
    if report.detections.is_empty() {
        println!("No supported package managers for this platform");
    }
    for detection in &report.detections {
        match &detection.executable {
            Some(path) => println!("✓ {:<10} Installed at: {}", detection.kind, path.display()),
            None => println!("✗ {:<10} Not installed", detection.kind),
        }
    }
}

fn print_guide(report: &InitReport, kind: crate::pkgmgr::ManagerKind) {
    let Some(guide) = install_guide(kind, report.platform) else {
        println!("\nNo installation guide available for {}", kind);
        return;
    };

    println!("\nManual Installation Guide for {}", kind);
    println!("{}", "-".repeat(50));
    for (i, step) in guide.steps.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
    println!("\nMore info: {}", guide.url);
    println!("Verify installation: {}", guide.verify_command);
}
