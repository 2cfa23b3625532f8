//! Inspect command implementation
//!
//! Prints the run metadata of a mapping artifact without exposing the
//! mapped values themselves.

use std::path::Path;

use clap::Args;

use crate::core::store::MappingArtifact;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Mapping artifact path
    #[arg(short, long, default_value = "cloak_mappings.json")]
    pub mapping: String,
}

impl InspectArgs {
    /// Execute the inspect command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(path = %self.mapping, "Starting inspect command");

        println!("🔍 Inspecting mapping artifact: {}", self.mapping);
        println!();

        // load() verifies the forward and backward tables agree, so a
        // corrupt artifact never reaches the summary below
        let artifact = match MappingArtifact::load(Path::new(&self.mapping)) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, path = %self.mapping, "Failed to load mapping artifact");
                eprintln!("❌ Failed to load mapping artifact: {e}");
                return Ok(3);
            }
        };

        let total: usize = artifact.metadata.per_category_counts.values().sum();

        println!("📊 Run Metadata:");
        println!("  Run ID: {}", artifact.metadata.run_id);
        println!("  Timestamp: {}", artifact.metadata.timestamp.to_rfc3339());
        println!("  Total mappings: {total}");
        println!();
        println!("  Mappings per category:");
        if artifact.metadata.per_category_counts.is_empty() {
            println!("    (none)");
        }
        for (category, count) in &artifact.metadata.per_category_counts {
            println!("    {category}: {count}");
        }
        println!();
        println!("✅ Artifact is valid (forward and backward tables agree)");

        Ok(0)
    }
}
