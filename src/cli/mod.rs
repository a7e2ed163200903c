//! Command-line interface for inspecting SentinelSync configuration.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::{AppSettings, LogLevel};
use crate::infrastructure::config::{ConfigLoader, SettingsProvider, DEFAULT_CONFIG_PATH};

/// Inspect and validate the SentinelSync replication configuration.
#[derive(Parser, Debug)]
#[command(name = "sentinelsync", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        long,
        short,
        global = true,
        env = "SENTINELSYNC_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    pub config: PathBuf,

    /// Ignore environment variable overrides and read only the file
    #[arg(long, global = true)]
    pub no_env: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit debug logs on stderr, whatever `app.log_level` says
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a summary of the resolved configuration (secrets omitted)
    Show,
    /// Load the configuration and report every validation problem
    Validate,
    /// Print the fully resolved configuration as YAML (or JSON with --json)
    Dump(commands::dump::DumpArgs),
}

impl Cli {
    /// Provider for the configured path, honouring `--no-env`.
    pub fn provider(&self) -> SettingsProvider {
        let loader = ConfigLoader::new(&self.config);
        if self.no_env {
            SettingsProvider::without_env_overrides(loader)
        } else {
            SettingsProvider::new(loader)
        }
    }
}

/// Level for the CLI's own logging.
///
/// `--verbose` forces `Debug`. Otherwise the configured `app.log_level` is used,
/// and `Warning` when the configuration could not be loaded or the level is unknown.
pub fn log_level_for(verbose: bool, settings: Option<&AppSettings>) -> LogLevel {
    if verbose {
        return LogLevel::Debug;
    }
    settings
        .and_then(AppSettings::log_level_value)
        .unwrap_or(LogLevel::Warning)
}

/// Print an error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::RawConfig;

    fn settings_with_level(level: &str) -> AppSettings {
        AppSettings {
            log_level: level.to_string(),
            ..RawConfig::default().into_settings()
        }
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["sentinelsync", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Show));
        assert!(!cli.no_env);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sentinelsync",
            "dump",
            "--show-secrets",
            "--config",
            "/etc/sentinelsync/app.yaml",
            "--no-env",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/sentinelsync/app.yaml"));
        assert!(cli.no_env);
        assert!(cli.json);
        match cli.command {
            Commands::Dump(args) => assert!(args.show_secrets),
            other => panic!("Expected Dump, got {other:?}"),
        }
    }

    #[test]
    fn test_log_level_follows_settings() {
        let settings = settings_with_level("ERROR");
        assert_eq!(log_level_for(false, Some(&settings)), LogLevel::Error);
        assert_eq!(log_level_for(true, Some(&settings)), LogLevel::Debug);
    }

    #[test]
    fn test_log_level_falls_back_to_warning() {
        let unknown = settings_with_level("verbose");
        assert_eq!(log_level_for(false, None), LogLevel::Warning);
        assert_eq!(log_level_for(false, Some(&unknown)), LogLevel::Warning);
        assert_eq!(log_level_for(true, None), LogLevel::Debug);
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["sentinelsync"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
