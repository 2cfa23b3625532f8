//! Anonymize command implementation
//!
//! This module implements the `anonymize` command: mask every bound
//! column of a row file, write the masked rows, and persist the mapping
//! artifact that makes the run reversible.

use std::path::{Path, PathBuf};

use clap::Args;
use tokio::sync::watch;

use crate::adapters::classifier;
use crate::cli::commands::{parse_bind_overrides, read_rows, write_rows};
use crate::config::load_config;
use crate::core::audit::AuditLogger;
use crate::core::engine::Pseudonymizer;
use crate::core::generator::FakeValueGenerator;
use crate::core::store::MappingArtifact;
use crate::core::{pool, tabular};

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Input row file (JSON array or NDJSON)
    #[arg(short, long)]
    pub input: String,

    /// Output file for masked rows (written in the input's format)
    #[arg(short, long)]
    pub output: String,

    /// Mapping artifact path
    #[arg(short, long, default_value = "cloak_mappings.json")]
    pub mapping: String,

    /// Extend an existing mapping artifact instead of starting fresh
    #[arg(long)]
    pub extend: bool,

    /// Override column bindings (comma-separated column=category pairs)
    #[arg(long, value_name = "BINDINGS")]
    pub bind: Option<String>,

    /// Override classifier mode (off, pattern or remote)
    #[arg(long, value_name = "MODE")]
    pub classifier_mode: Option<String>,

    /// Mask rows without writing the output file or the artifact
    #[arg(long)]
    pub dry_run: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(ref bind) = self.bind {
            let pairs = match parse_bind_overrides(bind) {
                Ok(pairs) => pairs,
                Err(e) => {
                    eprintln!("Invalid --bind value: {e}");
                    return Ok(2);
                }
            };
            for (column, category) in pairs {
                tracing::info!(
                    column = %column,
                    category = %category,
                    "Overriding column binding from CLI"
                );
                config.columns.insert(column, category);
            }
        }

        if let Some(ref mode) = self.classifier_mode {
            tracing::info!(mode = %mode, "Overriding classifier mode from CLI");
            config.classifier.mode = mode.clone();
        }

        // Validate configuration after overrides
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let bindings = match config.column_bindings() {
            Ok(bindings) => bindings,
            Err(e) => {
                eprintln!("Invalid column bindings: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No output or artifact will be written");
            println!();
        }

        // Read input rows
        let (rows, format) = match read_rows(&self.input) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input rows");
                eprintln!("Failed to read input rows: {e}");
                return Ok(3);
            }
        };
        if rows.is_empty() {
            println!("⚠️  Input contains no rows, nothing to do");
            return Ok(0);
        }

        if *shutdown_signal.borrow() {
            println!("⚠️  Shutdown requested, aborting before classification");
            return Ok(130);
        }

        // Resolve unbound columns with the configured classifier
        let bindings = match classifier::from_config(&config.classifier) {
            Ok(Some(entity_classifier)) => {
                tracing::info!(mode = %config.classifier.mode, "Classifying unbound columns");
                match classifier::resolve_unbound_columns(
                    entity_classifier.as_ref(),
                    &rows,
                    &bindings,
                    &config.classifier,
                )
                .await
                {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        tracing::error!(error = %e, "Column classification failed");
                        eprintln!("Column classification failed: {e}");
                        return Ok(5);
                    }
                }
            }
            Ok(None) => bindings,
            Err(e) => {
                eprintln!("Failed to build classifier: {e}");
                return Ok(2);
            }
        };

        if bindings.is_empty() {
            println!("⚠️  No columns are bound to a category; output will equal input");
            println!("   Configure [columns] or pass --bind column=category");
        }

        // Build pools
        let pools = match config.pools.pool_file {
            Some(ref path) => match pool::load_pools(path) {
                Ok(pools) => pools,
                Err(e) => {
                    eprintln!("Failed to load pool file {}: {e}", path.display());
                    return Ok(2);
                }
            },
            None => pool::default_pools(config.pools.size, config.pools.rng_seed),
        };
        let generator = FakeValueGenerator::new(pools, config.generator, config.pools.rng_seed);

        // Start fresh or extend a prior artifact
        let mapping_path = Path::new(&self.mapping);
        let mut engine = if self.extend && mapping_path.exists() {
            match MappingArtifact::load(mapping_path) {
                Ok(artifact) => {
                    tracing::info!(path = %self.mapping, "Extending existing mapping artifact");
                    Pseudonymizer::with_store(artifact.into_store(), generator)
                }
                Err(e) => {
                    eprintln!("Failed to load mapping artifact {}: {e}", self.mapping);
                    return Ok(3);
                }
            }
        } else {
            if self.extend {
                tracing::warn!(
                    path = %self.mapping,
                    "No existing artifact to extend, starting fresh"
                );
            }
            Pseudonymizer::new(generator)
        };

        if config.audit.enabled && !self.dry_run {
            match AuditLogger::new(PathBuf::from(&config.audit.log_path), true) {
                Ok(logger) => engine = engine.with_audit_logger(logger),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to prepare audit log");
                    eprintln!("Failed to prepare audit log: {e}");
                    return Ok(5);
                }
            }
        }

        if *shutdown_signal.borrow() {
            println!("⚠️  Shutdown requested, aborting before masking");
            return Ok(130);
        }

        // Mask the table
        println!("🚀 Anonymizing {} rows...", rows.len());
        let masked = match tabular::anonymize_table(&mut engine, &rows, &bindings) {
            Ok(masked) => masked,
            Err(e) => {
                tracing::error!(error = %e, "Anonymization failed");
                eprintln!("Anonymization failed: {e}");
                return Ok(5);
            }
        };

        if self.dry_run {
            let store = engine.store();
            println!();
            println!("📊 Anonymization Summary (dry run):");
            println!("  Rows: {}", masked.len());
            for category in store.categories() {
                println!("  {}: {} mappings", category, store.count(category));
            }
            println!();
            println!("✅ Dry run complete, nothing written");
            return Ok(0);
        }

        // The artifact goes first: masked rows without their artifact
        // cannot be unmasked
        let artifact = match engine.persist(mapping_path) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist mapping artifact");
                eprintln!("Failed to persist mapping artifact: {e}");
                return Ok(5);
            }
        };

        if let Err(e) = write_rows(&self.output, &masked, format) {
            tracing::error!(error = %e, "Failed to write masked rows");
            eprintln!("Failed to write masked rows: {e}");
            return Ok(5);
        }

        // Display summary
        println!();
        println!("📊 Anonymization Summary:");
        println!("  Rows: {}", masked.len());
        println!("  Bound columns: {}", bindings.len());
        for (category, count) in &artifact.metadata.per_category_counts {
            println!("  {category}: {count} mappings");
        }
        println!("  Masked rows: {}", self.output);
        println!("  Mapping artifact: {}", self.mapping);
        println!();
        println!("✅ Anonymization completed successfully!");

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymize_args_defaults() {
        let args = AnonymizeArgs {
            input: "rows.json".to_string(),
            output: "masked.json".to_string(),
            mapping: "cloak_mappings.json".to_string(),
            extend: false,
            bind: None,
            classifier_mode: None,
            dry_run: false,
        };

        assert_eq!(args.mapping, "cloak_mappings.json");
        assert!(!args.extend);
        assert!(!args.dry_run);
        assert!(args.bind.is_none());
    }

    #[test]
    fn test_anonymize_args_with_overrides() {
        let args = AnonymizeArgs {
            input: "rows.json".to_string(),
            output: "masked.json".to_string(),
            mapping: "run.json".to_string(),
            extend: true,
            bind: Some("vendor=company".to_string()),
            classifier_mode: Some("off".to_string()),
            dry_run: true,
        };

        assert!(args.extend);
        assert!(args.dry_run);
        assert_eq!(args.bind.as_deref(), Some("vendor=company"));
        assert_eq!(args.classifier_mode.as_deref(), Some("off"));
    }
}
