//! Unmask command implementation
//!
//! The inverse of `mask`: replaces synthetic substitutes in free text
//! or SQL with the original values recorded in the mapping artifact.

use std::fs;
use std::path::Path;

use clap::Args;

use crate::cli::commands::read_text;
use crate::core::sql::SqlSubstituter;
use crate::core::store::MappingArtifact;
use crate::core::text::TextSubstituter;

/// Arguments for the unmask command
#[derive(Args, Debug)]
pub struct UnmaskArgs {
    /// Input text file (reads stdin when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Mapping artifact path
    #[arg(short, long, default_value = "cloak_mappings.json")]
    pub mapping: String,

    /// Treat the input as SQL and substitute only string literals
    #[arg(long)]
    pub sql: bool,
}

impl UnmaskArgs {
    /// Execute the unmask command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(sql = self.sql, "Starting unmask command");

        let artifact = match MappingArtifact::load(Path::new(&self.mapping)) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, path = %self.mapping, "Failed to load mapping artifact");
                eprintln!("Failed to load mapping artifact {}: {e}", self.mapping);
                return Ok(3);
            }
        };
        let store = artifact.into_store();

        let text = match read_text(self.input.as_deref()) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return Ok(3);
            }
        };

        let restored = if self.sql {
            match SqlSubstituter::new(&store).unmask(&text) {
                Ok(restored) => restored,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to unmask SQL input");
                    eprintln!("Failed to unmask SQL input: {e}");
                    return Ok(3);
                }
            }
        } else {
            TextSubstituter::new(&store).unmask(&text)
        };

        match self.output {
            Some(ref output) => {
                if let Err(e) = fs::write(output, &restored) {
                    tracing::error!(error = %e, path = %output, "Failed to write restored output");
                    eprintln!("Failed to write restored output: {e}");
                    return Ok(5);
                }
                println!("✅ Restored output written to {output}");
            }
            // Bare text on stdout so the command can be piped
            None => print!("{restored}"),
        }

        Ok(0)
    }
}
