//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Cloak using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cloak - Reversible Pseudonymization Tool
#[derive(Parser, Debug)]
#[command(name = "cloak")]
#[command(version, about, long_about = None)]
#[command(author = "Cloak Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cloak.toml", env = "CLOAK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLOAK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize tabular rows, writing masked rows and the mapping artifact
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore original values in masked rows from a mapping artifact
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Mask free text or SQL against a mapping artifact
    Mask(commands::mask::MaskArgs),

    /// Unmask free text or SQL against a mapping artifact
    Unmask(commands::unmask::UnmaskArgs),

    /// Show mapping artifact metadata
    Inspect(commands::inspect::InspectArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from([
            "cloak",
            "anonymize",
            "--input",
            "rows.json",
            "--output",
            "masked.json",
        ]);
        assert_eq!(cli.config, "cloak.toml");
        assert!(matches!(cli.command, Commands::Anonymize(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from([
            "cloak",
            "--config",
            "custom.toml",
            "anonymize",
            "--input",
            "rows.json",
            "--output",
            "masked.json",
        ]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["cloak", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["cloak", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_mask_defaults() {
        let cli = Cli::parse_from(["cloak", "mask"]);
        match cli.command {
            Commands::Mask(args) => {
                assert_eq!(args.mapping, "cloak_mappings.json");
                assert!(args.input.is_none());
                assert!(!args.sql);
            }
            _ => panic!("Expected mask command"),
        }
    }

    #[test]
    fn test_cli_parse_unmask_sql() {
        let cli = Cli::parse_from(["cloak", "unmask", "--sql", "--input", "queries.sql"]);
        match cli.command {
            Commands::Unmask(args) => {
                assert!(args.sql);
                assert_eq!(args.input.as_deref(), Some("queries.sql"));
            }
            _ => panic!("Expected unmask command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["cloak", "inspect", "--mapping", "run42.json"]);
        match cli.command {
            Commands::Inspect(args) => assert_eq!(args.mapping, "run42.json"),
            _ => panic!("Expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["cloak", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
