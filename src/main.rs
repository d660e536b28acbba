use anyhow::Result;
use clap::Parser;
use devctl::application::{ExportTarget, ImportOptions};
use devctl::commands;
use devctl::config::{Settings, SettingsOverrides};
use std::path::PathBuf;
use std::time::Duration;

/// devctl - declarative package management for developer machines
///
/// Detects the package managers installed on this machine, installs the
/// packages listed in a manifest at the pinned versions, and exports the
/// managed set so it can be reproduced elsewhere.
///
/// Examples:
///   devctl init                             # Detect package managers
///   devctl import devctl-export.windows.json
///   devctl export -d ~/backup               # Write the managed packages
#[derive(Parser, Debug)]
#[command(author, version = env!("DEVCTL_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (also via DEVCTL_DEBUG)
    #[arg(long, env = "DEVCTL_DEBUG", global = true)]
    pub debug: bool,

    /// Data directory (defaults to ~/.devctl; also via DEVCTL_DATA_DIR)
    #[arg(long, env = "DEVCTL_DATA_DIR", value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Configuration directory (defaults to ~/.config/devctl; also via DEVCTL_CONFIG_DIR)
    #[arg(long, env = "DEVCTL_CONFIG_DIR", value_name = "PATH", global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Detect package managers and write the configuration file
    Init,

    /// Install the packages listed in a manifest file
    Import(ImportArgs),

    /// Export the managed packages to a manifest file
    Export(ExportArgs),

    /// Show configured package managers and managed packages
    List,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Manifest file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Fail before installing anything if a package names an unconfigured manager
    #[arg(long)]
    pub strict: bool,

    /// Timeout in seconds for each package manager invocation
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Directory to write the export file into
    #[arg(short = 'd', long = "dir", value_name = "DIR", conflicts_with = "output")]
    pub dir: Option<PathBuf>,

    /// Exact path of the export file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

impl ExportArgs {
    fn target(&self) -> ExportTarget {
        match (&self.output, &self.dir) {
            (Some(file), _) => ExportTarget::File(file.clone()),
            (None, Some(dir)) => ExportTarget::Directory(dir.clone()),
            (None, None) => ExportTarget::CurrentDir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let runtime = devctl::runtime::RealRuntime;
    let settings = Settings::resolve(
        &runtime,
        SettingsOverrides {
            debug: cli.debug,
            data_dir: cli.data_dir,
            config_dir: cli.config_dir,
        },
    )?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_filter()),
    )
    .init();

    match cli.command {
        Commands::Init => commands::init(runtime, &settings)?,
        Commands::Import(args) => {
            commands::import(
                runtime,
                &settings,
                &args.file,
                ImportOptions {
                    strict: args.strict,
                },
                args.timeout.map(Duration::from_secs),
            )
            .await?
        }
        Commands::Export(args) => {
            let target = args.target();
            commands::export(runtime, &settings, target, args.yes)?
        }
        Commands::List => commands::list(runtime, &settings)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_import_parsing() {
        let cli = Cli::try_parse_from(["devctl", "import", "packages.json"]).unwrap();
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.file, PathBuf::from("packages.json"));
                assert!(!args.strict);
                assert_eq!(args.timeout, None);
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_cli_import_flags() {
        let cli = Cli::try_parse_from([
            "devctl",
            "import",
            "packages.json",
            "--strict",
            "--timeout",
            "300",
        ])
        .unwrap();
        match cli.command {
            Commands::Import(args) => {
                assert!(args.strict);
                assert_eq!(args.timeout, Some(300));
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[test]
    fn test_cli_import_requires_file() {
        assert!(Cli::try_parse_from(["devctl", "import"]).is_err());
    }

    #[test]
    fn test_cli_export_default_target() {
        let cli = Cli::try_parse_from(["devctl", "export"]).unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.target(), ExportTarget::CurrentDir);
                assert!(!args.yes);
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_export_dir_and_output() {
        let cli = Cli::try_parse_from(["devctl", "export", "-d", "/tmp", "-y"]).unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.target(), ExportTarget::Directory(PathBuf::from("/tmp")));
                assert!(args.yes);
            }
            _ => panic!("Expected Export command"),
        }

        let cli = Cli::try_parse_from(["devctl", "export", "-o", "out.json"]).unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.target(), ExportTarget::File(PathBuf::from("out.json")));
            }
            _ => panic!("Expected Export command"),
        }
    }

    #[test]
    fn test_cli_export_dir_conflicts_with_output() {
        let result = Cli::try_parse_from(["devctl", "export", "-d", "/tmp", "-o", "out.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "devctl",
            "list",
            "--debug",
            "--config-dir",
            "/tmp/cfg",
            "--data-dir",
            "/tmp/data",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/cfg")));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/data")));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["devctl"]).is_err());
    }
}
