use anyhow::{Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::version;

/// A package a manifest wants present at a specific version.
///
/// Missing or `null` fields deserialize as empty strings; such entries are
/// invalid and get dropped rather than failing the whole manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DesiredPackage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub version: String,
    /// Identifier of the package manager that owns this package (e.g. "scoop").
    #[serde(default, rename = "installedBy", deserialize_with = "null_as_empty")]
    pub manager: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl DesiredPackage {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        manager: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            manager: manager.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("package name is required");
        }
        if version::is_empty(&self.version) {
            bail!("package version is required");
        }
        if self.manager.is_empty() {
            bail!("installedBy is required");
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for DesiredPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.version.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}@{}", self.name, self.version)
        }
    }
}
