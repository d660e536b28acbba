//! MCP clients: applications whose configuration devopsctl can edit.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::McpError;
use super::config_file::ClientConfigFile;
use super::types::McpServer;
use crate::pkgmgr::Platform;
use crate::runtime::Runtime;

pub trait McpClient: Send + Sync {
    /// Identifier used on the command line, e.g. "claude-code".
    fn name(&self) -> &'static str;

    fn config_path(&self) -> Result<PathBuf>;

    /// Installed servers, sorted by name.
    fn list_servers(&self) -> Result<Vec<McpServer>>;

    /// Add `server`. Fails with [`McpError::ServerExists`] if the name is taken.
    fn install_server(&self, server: &McpServer) -> Result<()>;

    /// Remove `name`. Fails with [`McpError::ServerNotFound`] if absent.
    fn uninstall_server(&self, name: &str) -> Result<()>;
}

const CLAUDE_CONFIG_FILE: &str = "claude_desktop_config.json";

/// Claude desktop application, registered as "claude-code".
pub struct ClaudeDesktopClient<'a, R: Runtime> {
    runtime: &'a R,
    platform: Platform,
}

impl<'a, R: Runtime> ClaudeDesktopClient<'a, R> {
    pub fn new(runtime: &'a R, platform: Platform) -> Self {
        Self { runtime, platform }
    }

    fn config_file(&self) -> Result<ClientConfigFile<'a, R>> {
        Ok(ClientConfigFile::new(self.runtime, self.config_path()?))
    }
}

impl<'a, R: Runtime> McpClient for ClaudeDesktopClient<'a, R> {
    fn name(&self) -> &'static str {
        "claude-code"
    }

    fn config_path(&self) -> Result<PathBuf> {
        let home = || self.runtime.home_dir().context("Could not find home directory");
        let dir = match self.platform {
            Platform::Windows => PathBuf::from(
                self.runtime
                    .env_var("APPDATA")
                    .context("APPDATA environment variable not set")?,
            )
            .join("Claude"),
            Platform::Darwin => home()?
                .join("Library")
                .join("Application Support")
                .join("Claude"),
            Platform::Linux => home()?.join(".config").join("claude"),
            Platform::Other => bail!("Unsupported operating system: {}", std::env::consts::OS),
        };
        Ok(dir.join(CLAUDE_CONFIG_FILE))
    }

    fn list_servers(&self) -> Result<Vec<McpServer>> {
        let config = self.config_file()?.read()?;
        Ok(config
            .servers
            .iter()
            .map(|(name, entry)| entry.to_server(name))
            .collect())
    }

    fn install_server(&self, server: &McpServer) -> Result<()> {
        let file = self.config_file()?;
        let mut config = file.read()?;
        if config.servers.contains_key(&server.name) {
            return Err(McpError::ServerExists(server.name.clone()).into());
        }
        config.servers.insert(server.name.clone(), server.to_entry());
        file.write(&config)?;
        Ok(())
    }

    fn uninstall_server(&self, name: &str) -> Result<()> {
        let file = self.config_file()?;
        let mut config = file.read()?;
        if config.servers.remove(name).is_none() {
            return Err(McpError::ServerNotFound(name.to_string()).into());
        }
        file.write(&config)?;
        Ok(())
    }
}

/// Clients devopsctl supports, by name.
pub struct McpClientRegistry<'a> {
    clients: BTreeMap<&'static str, Box<dyn McpClient + 'a>>,
}

impl<'a> McpClientRegistry<'a> {
    pub fn new() -> Self {
        Self {
            clients: BTreeMap::new(),
        }
    }

    /// Registry with every built-in client.
    pub fn with_defaults<R: Runtime>(runtime: &'a R, platform: Platform) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ClaudeDesktopClient::new(runtime, platform)));
        registry
    }

    pub fn register(&mut self, client: Box<dyn McpClient + 'a>) {
        self.clients.insert(client.name(), client);
    }

    pub fn get(&self, name: &str) -> Result<&dyn McpClient> {
        self.clients
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| McpError::UnsupportedClient(name.to_string()).into())
    }

}

impl Default for McpClientRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}
