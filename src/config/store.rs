//! Persisted configuration file (`devctl.json`).
//!
//! The file is rewritten wholesale on every save. There is no locking, so two
//! devctl processes saving at the same time can lose each other's changes.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::APP_NAME;
use crate::package::DesiredPackage;
use crate::runtime::Runtime;

/// A package devctl has ensured is installed. Same shape as a manifest entry.
pub type PackageRecord = DesiredPackage;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRegistration {
    #[serde(default)]
    pub executable_path: PathBuf,
    #[serde(default)]
    pub version: String,
}

impl ManagerRegistration {
    pub fn new(executable_path: impl Into<PathBuf>) -> Self {
        Self {
            executable_path: executable_path.into(),
            version: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub data_dir: PathBuf,
    /// Keyed by manager ID, e.g. "scoop".
    #[serde(default)]
    pub package_managers: BTreeMap<String, ManagerRegistration>,
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
}

/// Loads and saves [`Config`] at `<config_dir>/devctl.json`.
pub struct ConfigStore<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> ConfigStore<'a, R> {
    pub fn new(runtime: &'a R, config_dir: &Path) -> Self {
        Self {
            runtime,
            path: config_dir.join(format!("{}.json", APP_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the configuration. A missing file yields the default configuration.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Result<Config> {
        if !self.runtime.exists(&self.path) {
            debug!("No config file at {}, using defaults", self.path.display());
            return Ok(Config::default());
        }

        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", self.path.display()))
    }

    /// Write the configuration to a temporary file next to the target and
    /// rename it into place.
    #[tracing::instrument(skip(self, config))]
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime
                .create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        let tmp_path = self.path.with_extension("json.tmp");

        self.runtime
            .write(&tmp_path, content.as_bytes())
            .with_context(|| format!("Failed to write config file {}", tmp_path.display()))?;

        if let Err(e) = self.runtime.rename(&tmp_path, &self.path) {
            if let Err(cleanup) = self.runtime.remove_file(&tmp_path) {
                warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e).with_context(|| format!("Failed to save config file {}", self.path.display()));
        }

        debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}

/// Merge `new` records into `existing` by package name.
///
/// Existing order is kept, a record whose name already exists replaces it in
/// place, and unseen names are appended. Later records win.
pub fn merge_packages(existing: &[PackageRecord], new: &[PackageRecord]) -> Vec<PackageRecord> {
    let mut merged: Vec<PackageRecord> = Vec::with_capacity(existing.len() + new.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for pkg in existing.iter().chain(new) {
        match positions.get(pkg.name.as_str()) {
            Some(&i) => merged[i] = pkg.clone(),
            None => {
                positions.insert(&pkg.name, merged.len());
                merged.push(pkg.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn pkg(name: &str, version: &str) -> PackageRecord {
        PackageRecord::new(name, version, "scoop")
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(Path::new("/config").join("devctl.json")))
            .returning(|_| false);

        let store = ConfigStore::new(&runtime, Path::new("/config"));
        assert_eq!(store.load().unwrap(), Config::default());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("{ not json".to_string()));

        let store = ConfigStore::new(&runtime, Path::new("/config"));
        let err = store.load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_load_file_format() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{
                "dataDir": "/home/user/.devctl",
                "packageManagers": {"scoop": {"executablePath": "C:/scoop/shims/scoop.cmd", "version": ""}},
                "packages": [{"name": "git", "version": "2.40.0", "installedBy": "scoop"}]
            }"#
            .to_string())
        });

        let config = ConfigStore::new(&runtime, Path::new("/config")).load().unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/home/user/.devctl"));
        assert_eq!(
            config.package_managers["scoop"].executable_path,
            PathBuf::from("C:/scoop/shims/scoop.cmd")
        );
        assert_eq!(config.packages, vec![pkg("git", "2.40.0")]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested").join("devctl");
        let runtime = RealRuntime;
        let store = ConfigStore::new(&runtime, &config_dir);

        let mut config = Config {
            data_dir: dir.path().join("data"),
            ..Default::default()
        };
        config
            .package_managers
            .insert("scoop".into(), ManagerRegistration::new("/usr/bin/scoop"));
        config.packages.push(pkg("git", "2.40.0"));

        store.save(&config).unwrap();

        assert!(config_dir.join("devctl.json").exists());
        assert!(!config_dir.join("devctl.json.tmp").exists());
        assert_eq!(store.load().unwrap(), config);

        let raw = std::fs::read_to_string(config_dir.join("devctl.json")).unwrap();
        assert!(raw.contains("\"packageManagers\""));
        assert!(raw.contains("\"executablePath\""));
        assert!(raw.contains("\"installedBy\""));
    }

    #[test]
    fn test_save_removes_temp_file_when_rename_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_write()
            .with(eq(Path::new("/config").join("devctl.json.tmp")), mockall::predicate::always())
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .returning(|_, _| Err(anyhow::anyhow!("access denied")));
        runtime
            .expect_remove_file()
            .with(eq(Path::new("/config").join("devctl.json.tmp")))
            .times(1)
            .returning(|_| Ok(()));

        let store = ConfigStore::new(&runtime, Path::new("/config"));
        let err = store.save(&Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to save config file"));
    }

    #[test]
    fn test_merge_replaces_in_place_and_appends() {
        let existing = vec![pkg("git", "2.40.0"), pkg("vim", "9.0.0")];
        let new = vec![pkg("curl", "8.5.0"), pkg("git", "2.41.0")];

        let merged = merge_packages(&existing, &new);

        assert_eq!(
            merged,
            vec![pkg("git", "2.41.0"), pkg("vim", "9.0.0"), pkg("curl", "8.5.0")]
        );
    }

    #[test]
    fn test_merge_last_record_wins() {
        let merged = merge_packages(&[], &[pkg("git", "2.40.0"), pkg("git", "2.41.0")]);
        assert_eq!(merged, vec![pkg("git", "2.41.0")]);
    }

    #[test]
    fn test_merge_nothing_new_keeps_existing() {
        let existing = vec![pkg("git", "2.40.0")];
        assert_eq!(merge_packages(&existing, &[]), existing);
    }
}
