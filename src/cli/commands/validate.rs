//! Validate config command implementation
//!
//! This module implements the `validate-config` command for checking a
//! configuration file without touching any input or artifact.

use clap::Args;

use crate::config::load_config;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config substitutes env vars, applies overrides and runs
        // the full validation chain before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Bound Columns: {}", config.columns.len());
        for (column, category) in &config.columns {
            println!("    {column} -> {category}");
        }
        println!("  Pool Size: {}", config.pools.size);
        match config.pools.rng_seed {
            Some(seed) => println!("  RNG Seed: {seed} (deterministic)"),
            None => println!("  RNG Seed: none (random per run)"),
        }
        match config.pools.pool_file {
            Some(ref path) => println!("  Pool File: {}", path.display()),
            None => println!("  Pool File: built-in pools"),
        }
        println!("  Synthesis Retries: {}", config.generator.synthesis_retries);
        println!("  Fallback Ceiling: {}", config.generator.fallback_ceiling);
        println!("  Classifier Mode: {}", config.classifier.mode);
        if config.classifier.mode == "remote" {
            if let Some(ref endpoint) = config.classifier.endpoint {
                println!("  Classifier Endpoint: {endpoint}");
            }
            println!("  Classifier Concurrency: {}", config.classifier.max_concurrency);
            println!("  Classifier Timeout: {}s", config.classifier.timeout_seconds);
        }
        if config.classifier.mode != "off" {
            println!("  Classifier Sample Size: {}", config.classifier.sample_size);
            println!("  Classifier Min Matches: {}", config.classifier.min_matches);
        }
        println!("  Audit Enabled: {}", config.audit.enabled);
        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path);
        }
        println!("  File Logging: {}", config.logging.local_enabled);
        if config.logging.local_enabled {
            println!("  Log Directory: {}", config.logging.local_path);
            println!("  Log Rotation: {}", config.logging.local_rotation);
        }
        println!();

        Ok(0)
    }
}
