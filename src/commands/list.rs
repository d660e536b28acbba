use anyhow::Result;

use crate::config::{ConfigStore, Settings};
use crate::runtime::Runtime;

/// Show registered package managers and managed packages
#[tracing::instrument(skip(runtime, settings))]
pub fn list<R: Runtime>(runtime: R, settings: &Settings) -> Result<()> {
    let config = ConfigStore::new(&runtime, &settings.config_dir).load()?;
    println!("Config file: {}", settings.config_file().display());
    println!();

    if config.package_managers.is_empty() {
        println!("No package managers configured. Run 'devctl init' first.");
    } else {
        println!("Package managers:");
        for (id, registration) in &config.package_managers {
            println!("  {:<10} {}", id, registration.executable_path.display());
        }
    }

    println!();
    if config.packages.is_empty() {
        println!("No packages managed by devctl.");
    } else {
        println!("Packages:");
        for package in &config.packages {
            println!(
                "  {} {} ({})",
                package.name, package.version, package.manager
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::path::PathBuf;

    fn settings() -> Settings {
        Settings {
            debug: false,
            data_dir: PathBuf::from("/data"),
            config_dir: PathBuf::from("/config"),
        }
    }

    #[test]
    fn test_list_without_config() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        assert!(list(runtime, &settings()).is_ok());
    }

    #[test]
    fn test_list_malformed_config_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("[".to_string()));

        assert!(list(runtime, &settings()).is_err());
    }
}
