//! Deanonymize command implementation
//!
//! Restores the original values of a masked row file using the mapping
//! artifact produced by a prior anonymize run.

use std::path::Path;

use clap::Args;

use crate::cli::commands::{parse_bind_overrides, read_rows, write_rows};
use crate::config::load_config;
use crate::core::store::MappingArtifact;
use crate::core::tabular;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// Masked row file (JSON array or NDJSON)
    #[arg(short, long)]
    pub input: String,

    /// Output file for restored rows
    #[arg(short, long)]
    pub output: String,

    /// Mapping artifact path
    #[arg(short, long, default_value = "cloak_mappings.json")]
    pub mapping: String,

    /// Override column bindings (comma-separated column=category pairs)
    #[arg(long, value_name = "BINDINGS")]
    pub bind: Option<String>,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting deanonymize command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(ref bind) = self.bind {
            let pairs = match parse_bind_overrides(bind) {
                Ok(pairs) => pairs,
                Err(e) => {
                    eprintln!("Invalid --bind value: {e}");
                    return Ok(2);
                }
            };
            for (column, category) in pairs {
                config.columns.insert(column, category);
            }
        }

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

        // Load the mapping artifact
        let artifact = match MappingArtifact::load(Path::new(&self.mapping)) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, path = %self.mapping, "Failed to load mapping artifact");
                eprintln!("Failed to load mapping artifact {}: {e}", self.mapping);
                return Ok(3);
            }
        };
        let store = artifact.into_store();

        // Read masked rows
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

        // Restore and write
        println!("🚀 Deanonymizing {} rows...", rows.len());
        let restored = tabular::deanonymize_table(&store, &rows, &bindings);

        if let Err(e) = write_rows(&self.output, &restored, format) {
            tracing::error!(error = %e, "Failed to write restored rows");
            eprintln!("Failed to write restored rows: {e}");
            return Ok(5);
        }

        println!();
        println!("📊 Deanonymization Summary:");
        println!("  Rows: {}", restored.len());
        println!("  Bound columns: {}", bindings.len());
        println!("  Restored rows: {}", self.output);
        println!();
        println!("✅ Deanonymization completed successfully!");

        Ok(0)
    }
}
