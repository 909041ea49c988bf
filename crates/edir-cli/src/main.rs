//! edir-provision - eDirectory user and group provisioning
//!
//! Opens an eDirectory REST API session, creates the users and groups listed
//! in flat `key: value` entry files, and deletes the session again.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::CommandContext;
use edir_core::{EntryKind, ProvisionConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "edir-provision")]
#[command(version = edir_core::VERSION)]
#[command(about = "Provision eDirectory users and groups through the REST API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (TOML); falls back to EDIR_CONFIG, which may come from the env file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Environment file loaded before reading EDIR_* variables
    #[arg(long, global = true, default_value = ".env")]
    env_file: PathBuf,

    /// eDirectory REST API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Users entry file
    #[arg(long, global = true)]
    users_file: Option<PathBuf>,

    /// Groups entry file
    #[arg(long, global = true)]
    groups_file: Option<PathBuf>,

    /// Directory for the per-category log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Diagnostic log level on stderr (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output format for reports
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Suppress the console transcript
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configured users and groups (default)
    Run {
        /// Parse and report without contacting the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse an entry file and print the entries it contains
    Parse {
        /// Entry file to parse
        file: PathBuf,

        /// Kind of entries in the file
        #[arg(short, long, value_enum, default_value = "user")]
        kind: KindArg,

        /// Fail when any block is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Show the effective configuration
    ShowConfig,

    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    User,
    Group,
}

impl From<KindArg> for EntryKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::User => EntryKind::User,
            KindArg::Group => EntryKind::Group,
        }
    }
}

/// Config file location when `--config` is not given
const ENV_CONFIG: &str = "EDIR_CONFIG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; variables may come from the environment
    let _ = dotenvy::from_path(&cli.env_file);

    let config = load_config(&cli, |key| std::env::var(key).ok())?;

    // Diagnostics go to stderr so the transcript on stdout stays readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let ctx = CommandContext {
        config,
        output_format: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        None => commands::run::execute(&ctx, false).await,
        Some(Commands::Run { dry_run }) => commands::run::execute(&ctx, dry_run).await,
        Some(Commands::Parse { file, kind, strict }) => {
            commands::parse::execute(&ctx, &file, kind.into(), strict)
        }
        Some(Commands::ShowConfig) => commands::show_config::execute(&ctx),
        Some(Commands::Version) => {
            println!("edir-provision {}", edir_core::VERSION);
            Ok(())
        }
    }
}

/// Defaults, then the config file, then the environment, then flags.
/// `lookup` sees the environment after the env file was loaded.
fn load_config<F>(cli: &Cli, lookup: F) -> Result<ProvisionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config_path = cli.config.clone().or_else(|| {
        lookup(ENV_CONFIG)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });

    let mut config = match &config_path {
        Some(path) => ProvisionConfig::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ProvisionConfig::default(),
    };

    config.apply_env(&lookup);

    if let Some(url) = &cli.api_url {
        config.api.url = Some(url.clone());
    }
    if let Some(users) = &cli.users_file {
        config.input.users_file = Some(users.clone());
    }
    if let Some(groups) = &cli.groups_file {
        config.input.groups_file = Some(groups.clone());
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.directory = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::collections::HashMap;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("edir.toml");
        std::fs::write(
            &path,
            "[api]\nurl = \"https://file.example/api\"\n\n[logging]\ndirectory = \"file-logs\"\n",
        )
        .unwrap();

        let cli = Cli::parse_from([
            "edir-provision",
            "--config",
            path.to_str().unwrap(),
            "--log-dir",
            "flag-logs",
            "--users-file",
            "users.txt",
            "run",
            "--dry-run",
        ]);
        let config = load_config(&cli, |_| None).unwrap();

        assert_eq!(config.api.url.as_deref(), Some("https://file.example/api"));
        assert_eq!(config.logging.directory, PathBuf::from("flag-logs"));
        assert_eq!(config.input.users_file, Some(PathBuf::from("users.txt")));
        assert!(matches!(cli.command, Some(Commands::Run { dry_run: true })));
    }

    #[test]
    fn test_config_path_from_loaded_env() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("edir.toml");
        std::fs::write(&path, "[api]\ntree = \"FILE-TREE\"\n").unwrap();

        let vars: HashMap<String, String> = [
            (ENV_CONFIG.to_string(), path.display().to_string()),
            ("EDIR_LDAP_ORG".to_string(), "o=Env".to_string()),
        ]
        .into_iter()
        .collect();

        let cli = Cli::parse_from(["edir-provision", "show-config"]);
        let config = load_config(&cli, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.api.tree.as_deref(), Some("FILE-TREE"));
        assert_eq!(config.api.organization.as_deref(), Some("o=Env"));
    }

    #[test]
    fn test_config_flag_wins_over_env_path() {
        let cli = Cli::parse_from(["edir-provision", "--config", "/nonexistent/edir.toml"]);
        let err = load_config(&cli, |k| (k == ENV_CONFIG).then(|| "other.toml".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/edir.toml"));
    }

    #[test]
    fn test_parse_subcommand_kind() {
        let cli = Cli::parse_from(["edir-provision", "parse", "groups.txt", "--kind", "group"]);
        match cli.command {
            Some(Commands::Parse { kind, strict, .. }) => {
                assert_eq!(EntryKind::from(kind), EntryKind::Group);
                assert!(!strict);
            }
            _ => panic!("expected parse command"),
        }
    }
}
