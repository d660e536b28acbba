//! `devopsctl mcp` subcommands.

use anyhow::{Context, Result, anyhow};

use crate::mcp::{McpClientRegistry, McpError, McpServer};
use crate::pkgmgr::Platform;
use crate::runtime::Runtime;

#[tracing::instrument(skip(runtime, server))]
pub fn install<R: Runtime>(runtime: R, client_name: &str, server: McpServer) -> Result<()> {
    let registry = McpClientRegistry::with_defaults(&runtime, Platform::current());
    let client = registry.get(client_name)?;

    if let Err(e) = client.install_server(&server) {
        if let Some(McpError::ServerExists(name)) = e.downcast_ref::<McpError>() {
            return Err(anyhow!(
                "MCP server '{}' already exists. Use 'devopsctl mcp uninstall {} --mcp-client {}' to remove it first",
                name,
                name,
                client_name
            ));
        }
        return Err(e.context("Failed to install server"));
    }

    println!(
        "Successfully installed MCP server '{}' to {}",
        server.name, client_name
    );
    Ok(())
}

#[tracing::instrument(skip(runtime))]
pub fn uninstall<R: Runtime>(runtime: R, client_name: &str, name: &str) -> Result<()> {
    let registry = McpClientRegistry::with_defaults(&runtime, Platform::current());
    registry
        .get(client_name)?
        .uninstall_server(name)
        .context("Failed to uninstall server")?;

    println!(
        "Successfully uninstalled MCP server '{}' from {}",
        name, client_name
    );
    Ok(())
}

#[tracing::instrument(skip(runtime))]
pub fn list<R: Runtime>(runtime: R, client_name: &str, json: bool) -> Result<()> {
    let registry = McpClientRegistry::with_defaults(&runtime, Platform::current());
    let servers = registry
        .get(client_name)?
        .list_servers()
        .context("Failed to list servers")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&servers)?);
    } else if servers.is_empty() {
        println!("No MCP servers found for client '{}'", client_name);
    } else {
        print!("{}", format_table(&servers));
    }
    Ok(())
}

fn format_table(servers: &[McpServer]) -> String {
    let width = servers
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut table = format!("{:<width$}  COMMAND\n", "NAME", width = width);
    table.push_str(&format!("{:<width$}  -------\n", "----", width = width));
    for server in servers {
        table.push_str(&format!(
            "{:<width$}  {}\n",
            server.name,
            server.command_line(),
            width = width
        ));
    }
    table
}
