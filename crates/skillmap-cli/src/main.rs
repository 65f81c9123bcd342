//! skillmap - warehouse worker skill tracker
//!
//! Keeps worker skill levels in a local SQLite database and exports them as a
//! spreadsheet matrix or a PDF of radar charts.

mod commands;
mod config;
mod editor;
mod seed;
mod service;

use anyhow::Result;
use clap::Parser;
use commands::Commands;
use config::Config;
use service::SkillService;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "skillmap", author, version, about = "Warehouse worker skill tracker")]
struct Cli {
    /// Database file, overriding the configured path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Print results as JSON where supported
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    skillmap_logging::init_logging(&config.logging.level, config.logging.format)?;
    info!("Starting skillmap v{}", env!("CARGO_PKG_VERSION"));
    debug!("Database: {}", config.database.path);

    let service = SkillService::from_config(&config).await?;
    commands::run(&service, cli.command, cli.json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use commands::ExportFormat;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from([
            "skillmap",
            "update",
            "ana",
            "--rename",
            "ana maria",
            "--set",
            "Water Spider=4",
            "--set",
            "Pick=2",
            "--database",
            "other.db",
        ])
        .unwrap();

        assert_eq!(cli.database.as_deref(), Some("other.db"));
        match cli.command {
            Commands::Update {
                name,
                rename,
                levels,
                assignments,
            } => {
                assert_eq!(name, "ana");
                assert_eq!(rename.as_deref(), Some("ana maria"));
                assert!(levels.is_none());
                assert_eq!(
                    assignments,
                    vec![("Water Spider".to_string(), 4), ("Pick".to_string(), 2)]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_levels_list() {
        let cli = Cli::try_parse_from(["skillmap", "add", "ben", "--levels", "1,2,5"]).unwrap();
        match cli.command {
            Commands::Add { name, levels } => {
                assert_eq!(name, "ben");
                assert_eq!(levels, vec![1, 2, 5]);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["skillmap", "add", "ben", "--levels", "1,x"]).is_err());
    }

    #[test]
    fn test_parse_export() {
        let cli =
            Cli::try_parse_from(["skillmap", "--json", "export", "xlsx", "--group", "Lane Sort"])
                .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Export {
                format: ExportFormat::Xlsx { group: Some(ref g) }
            } if g == "Lane Sort"
        ));

        assert!(Cli::try_parse_from(["skillmap", "compare"]).is_err());
    }
}
