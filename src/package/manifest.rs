//! Manifest files: the declarative list of packages exchanged between machines.

use anyhow::{Context, Result, bail};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::pkgmgr::Platform;
use crate::runtime::Runtime;

use super::DesiredPackage;

/// `{"platform": "windows", "packages": [{"name", "version", "installedBy"}]}`
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    /// Operating system the manifest was exported on. Optional on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Entries that are not package objects at all (e.g. `null`) are dropped
    /// while parsing; the rest are kept even when invalid.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub packages: Vec<DesiredPackage>,
}

fn lenient_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<DesiredPackage>, D::Error> {
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(pkg) => Some(pkg),
            Err(e) => {
                debug!("Dropping manifest entry {}: {}", i, e);
                None
            }
        })
        .collect())
}

/// File name used by `export` when no explicit output file is given.
pub fn default_export_file_name(platform: Platform) -> String {
    format!("{}-export.{}.json", crate::config::APP_NAME, platform)
}

impl Manifest {
    /// Build an export manifest stamped with `platform`, keeping only valid packages.
    pub fn for_export(
        platform: Platform,
        packages: impl IntoIterator<Item = DesiredPackage>,
    ) -> Self {
        Self {
            platform: Some(platform.to_string()),
            packages: packages.into_iter().filter(|p| p.is_valid()).collect(),
        }
    }

    /// Read and parse a manifest, rejecting one built for another platform.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path, platform: Platform) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;
        manifest.check_platform(platform)?;
        Ok(manifest)
    }

    pub fn check_platform(&self, platform: Platform) -> Result<()> {
        match self.platform.as_deref() {
            Some(p) if !p.is_empty() && p != platform.as_str() => bail!(
                "Manifest is for platform '{}', but current platform is '{}'",
                p,
                platform
            ),
            _ => Ok(()),
        }
    }

    /// Valid entries in manifest order. Invalid entries are dropped.
    pub fn desired_packages(&self) -> Vec<DesiredPackage> {
        self.packages
            .iter()
            .enumerate()
            .filter_map(|(i, pkg)| match pkg.validate() {
                Ok(()) => Some(pkg.clone()),
                Err(e) => {
                    debug!("Dropping manifest entry {}: {}", i, e);
                    None
                }
            })
            .collect()
    }

    #[tracing::instrument(skip(self, runtime))]
    pub fn save<R: Runtime>(&self, runtime: &R, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !runtime.exists(parent)
        {
            runtime
                .create_dir_all(parent)
                .context("Failed to create output directory")?;
        }

        let content = serde_json::to_string_pretty(self)?;
        runtime
            .write(path, content.as_bytes())
            .with_context(|| format!("Failed to write manifest to {}", path.display()))
    }
}
