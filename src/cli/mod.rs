//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for veil using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// veil - reversible document anonymizer
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a file or a directory of files
    Run(commands::run::RunArgs),

    /// Resolve a redaction token back to its original text
    Lookup(commands::lookup::LookupArgs),

    /// List the entity types the detector supports
    Entities(commands::entities::EntitiesArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["veil", "run", "notes.txt"]);
        assert_eq!(cli.config, "veil.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["veil", "--config", "custom.toml", "run", "notes.txt"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["veil", "--log-level", "debug", "entities"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_lookup() {
        let cli = Cli::parse_from(["veil", "lookup", "[PERSON_ab12]"]);
        match cli.command {
            Commands::Lookup(args) => assert_eq!(args.token, "[PERSON_ab12]"),
            other => panic!("expected lookup, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_run_overrides() {
        let cli = Cli::parse_from([
            "veil",
            "run",
            "in.csv",
            "--slug-length",
            "8",
            "--allow",
            "localhost",
            "--preserve",
            "PERSON",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.slug_length, Some(8));
                assert_eq!(args.allow, vec!["localhost"]);
                assert_eq!(args.preserve, vec!["PERSON"]);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["veil", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
