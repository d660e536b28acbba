//! MCP server registration for MCP client applications.
//!
//! Each client keeps its servers under `mcpServers` in a JSON file. Edits
//! preserve every other key in that file, back the old file up with a
//! timestamp suffix and replace it atomically.

mod client;
mod config_file;
mod types;

use thiserror::Error;

pub use client::{ClaudeDesktopClient, McpClient, McpClientRegistry};
pub use types::McpServer;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("MCP server '{0}' already exists")]
    ServerExists(String),

    #[error("MCP server '{0}' not found")]
    ServerNotFound(String),

    #[error("Unsupported MCP client: {0}")]
    UnsupportedClient(String),
}
