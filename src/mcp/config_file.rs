//! Reading and writing an MCP client's configuration file.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::types::ClientConfig;
use crate::runtime::Runtime;

pub(crate) struct ClientConfigFile<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
}

impl<'a, R: Runtime> ClientConfigFile<'a, R> {
    pub fn new(runtime: &'a R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    /// Parse the file; a missing file is an empty configuration.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<ClientConfig> {
        if !self.runtime.exists(&self.path) {
            return Ok(ClientConfig::default());
        }
        let content = self
            .runtime
            .read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", self.path.display()))
    }

    /// Back up the current file, then replace it through a temp file and rename.
    #[tracing::instrument(skip(self, config), fields(path = %self.path.display()))]
    pub fn write(&self, config: &ClientConfig) -> Result<Option<PathBuf>> {
        let backup = self.backup()?;

        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime
                .create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        let tmp_path = append_extension(&self.path, "tmp");
        self.runtime
            .write(&tmp_path, content.as_bytes())
            .context("Failed to write temp config file")?;

        if let Err(e) = self.runtime.rename(&tmp_path, &self.path) {
            if let Err(cleanup) = self.runtime.remove_file(&tmp_path) {
                warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e).context("Failed to move temp config file into place");
        }

        Ok(backup)
    }

    fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.runtime.exists(&self.path) {
            return Ok(None);
        }
        let backup = append_extension(&self.path, &format!("backup.{}", backup_timestamp()));
        self.runtime
            .copy(&self.path, &backup)
            .context("Failed to create backup")?;
        debug!("Backed up {} to {}", self.path.display(), backup.display());
        Ok(Some(backup))
    }
}

/// `claude_desktop_config.json` + `tmp` -> `claude_desktop_config.json.tmp`
fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

fn backup_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use tempfile::tempdir;

    #[test]
    fn test_append_extension() {
        assert_eq!(
            append_extension(Path::new("/a/config.json"), "tmp"),
            PathBuf::from("/a/config.json.tmp")
        );
    }

    #[test]
    fn test_read_missing_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let file = ClientConfigFile::new(&runtime, PathBuf::from("/a/config.json"));
        assert_eq!(file.read().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_read_malformed_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("{\"mcpServers\": ".to_string()));

        let file = ClientConfigFile::new(&runtime, PathBuf::from("/a/config.json"));
        assert!(
            file.read()
                .unwrap_err()
                .to_string()
                .starts_with("Failed to parse config file")
        );
    }

    #[test]
    fn test_write_new_file_has_no_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Claude").join("claude_desktop_config.json");
        let runtime = RealRuntime;
        let file = ClientConfigFile::new(&runtime, path.clone());

        let backup = file.write(&ClientConfig::default()).unwrap();

        assert!(backup.is_none());
        assert!(path.exists());
        assert!(!append_extension(&path, "tmp").exists());
    }

    #[test]
    fn test_write_existing_file_is_backed_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("claude_desktop_config.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();
        let runtime = RealRuntime;
        let file = ClientConfigFile::new(&runtime, path.clone());

        let mut config = file.read().unwrap();
        config.extra.insert("theme".into(), "light".into());
        let backup = file.write(&config).unwrap().unwrap();

        assert_eq!(
            std::fs::read_to_string(&backup).unwrap(),
            r#"{"theme":"dark"}"#
        );
        assert_eq!(file.read().unwrap().extra["theme"], "light");
    }
}
