use anyhow::Result;
use clap::Parser;
use devctl::commands::mcp;
use devctl::mcp::McpServer;

/// devopsctl - manage MCP server entries in AI client configuration files
///
/// Examples:
///   devopsctl mcp install context7 --mcp-client claude-code -- npx -y @upstash/context7-mcp
///   devopsctl mcp list --mcp-client claude-code
#[derive(Parser, Debug)]
#[command(name = "devopsctl", author, version = env!("DEVCTL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (also via DEVCTL_DEBUG)
    #[arg(long, env = "DEVCTL_DEBUG", global = true)]
    pub debug: bool,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage MCP servers
    #[command(subcommand)]
    Mcp(McpCommands),
}

#[derive(clap::Subcommand, Debug)]
enum McpCommands {
    /// Add an MCP server to a client configuration
    Install(InstallArgs),

    /// Remove an MCP server from a client configuration
    Uninstall(UninstallArgs),

    /// List the MCP servers of a client configuration
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Server name
    pub name: String,

    /// Target client (e.g. claude-code)
    #[arg(long = "mcp-client", value_name = "CLIENT")]
    pub client: String,

    /// Environment variable for the server, repeatable
    #[arg(short = 'e', long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Command that starts the server, followed by its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Server name
    pub name: String,

    #[arg(long = "mcp-client", value_name = "CLIENT")]
    pub client: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[arg(long = "mcp-client", value_name = "CLIENT")]
    pub client: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl InstallArgs {
    fn into_server(self) -> McpServer {
        let mut parts = self.command.into_iter();
        let command = parts.next().unwrap_or_default();
        let mut server = McpServer::new(self.name, command, parts.collect());
        server.env = self.env.into_iter().collect();
        server
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = devctl::runtime::RealRuntime;

    match cli.command {
        Commands::Mcp(McpCommands::Install(args)) => {
            let client = args.client.clone();
            mcp::install(runtime, &client, args.into_server())?
        }
        Commands::Mcp(McpCommands::Uninstall(args)) => {
            mcp::uninstall(runtime, &args.client, &args.name)?
        }
        Commands::Mcp(McpCommands::List(args)) => mcp::list(runtime, &args.client, args.json)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_mcp_install_parsing() {
        let cli = Cli::try_parse_from([
            "devopsctl",
            "mcp",
            "install",
            "context7",
            "--mcp-client",
            "claude-code",
            "-e",
            "API_KEY=abc=def",
            "--",
            "npx",
            "-y",
            "@upstash/context7-mcp",
        ])
        .unwrap();
        match cli.command {
            Commands::Mcp(McpCommands::Install(args)) => {
                assert_eq!(args.client, "claude-code");
                let server = args.into_server();
                assert_eq!(server.name, "context7");
                assert_eq!(server.command, "npx");
                assert_eq!(server.args, vec!["-y", "@upstash/context7-mcp"]);
                assert_eq!(server.env.get("API_KEY").map(String::as_str), Some("abc=def"));
            }
            _ => panic!("Expected mcp install command"),
        }
    }

    #[test]
    fn test_cli_mcp_install_requires_command() {
        let result = Cli::try_parse_from([
            "devopsctl",
            "mcp",
            "install",
            "context7",
            "--mcp-client",
            "claude-code",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_mcp_install_rejects_bad_env() {
        let result = Cli::try_parse_from([
            "devopsctl",
            "mcp",
            "install",
            "x",
            "--mcp-client",
            "claude-code",
            "-e",
            "NOVALUE",
            "--",
            "node",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_mcp_uninstall_parsing() {
        let cli = Cli::try_parse_from([
            "devopsctl",
            "mcp",
            "uninstall",
            "context7",
            "--mcp-client",
            "claude-code",
        ])
        .unwrap();
        match cli.command {
            Commands::Mcp(McpCommands::Uninstall(args)) => {
                assert_eq!(args.name, "context7");
                assert_eq!(args.client, "claude-code");
            }
            _ => panic!("Expected mcp uninstall command"),
        }
    }

    #[test]
    fn test_cli_mcp_list_parsing() {
        let cli =
            Cli::try_parse_from(["devopsctl", "mcp", "list", "--mcp-client", "claude-code", "--json"])
                .unwrap();
        match cli.command {
            Commands::Mcp(McpCommands::List(args)) => assert!(args.json),
            _ => panic!("Expected mcp list command"),
        }
    }

    #[test]
    fn test_cli_mcp_client_required() {
        assert!(Cli::try_parse_from(["devopsctl", "mcp", "list"]).is_err());
    }
}
