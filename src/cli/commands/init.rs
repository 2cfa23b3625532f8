//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cloak.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Cloak configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} and bind your sensitive columns", self.output);
                println!("     under [columns] (column = \"category\")");
                println!("  2. Validate configuration: cloak validate-config");
                println!("  3. Anonymize a row file:");
                println!("     cloak anonymize --input rows.json --output masked.json");
                println!("  4. Restore it later:");
                println!("     cloak deanonymize --input masked.json --output restored.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Cloak Configuration File
# Reversible pseudonymization for tabular rows, free text and SQL

[application]
log_level = "info"

# Bind column names to entity categories.
# Categories: company, url, person, location, phone, email
[columns]
vendor = "company"
website = "url"
contact_name = "person"

[pools]
# Synthetic values generated per category
size = 1000
# Uncomment for reproducible fake values across runs
# rng_seed = 42

[classifier]
# Detect categories for unbound columns: off | pattern | remote
mode = "pattern"

[audit]
enabled = false
log_path = "cloak_audit.jsonl"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Cloak Configuration File
# Reversible pseudonymization for tabular rows, free text and SQL
#
# This file contains all configuration options with examples and explanations.
#
# A run replaces the values of bound columns with synthetic substitutes
# and records every replacement in a mapping artifact. The artifact is
# what makes mask/unmask and deanonymize possible, so treat it with the
# same care as the original data.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Column Bindings
# ============================================================================
# Map column names to entity categories. Matching is case-insensitive.
# Categories: company, url, person, location, phone, email
[columns]
vendor = "company"
website = "url"
contact_name = "person"
office_city = "location"
support_phone = "phone"
billing_email = "email"

# ============================================================================
# Fake Value Pools
# ============================================================================
[pools]
# Synthetic values generated per category (1-100000)
size = 1000

# Seed for deterministic pools and generator decisions.
# Omit for a different sequence every run.
# rng_seed = 42

# Optional JSON pool file overriding the built-in pools:
#   { "company": ["Hayes Group", ...], "person": [...] }
# pool_file = "pools.json"

# ============================================================================
# Generator Tuning
# ============================================================================
[generator]
# Resampling budget for URL synthesis before falling back to mutation
synthesis_retries = 16

# Upper bound on fallback counters; exceeding it aborts the run
fallback_ceiling = 100000

# ============================================================================
# Column Classifier
# ============================================================================
# Columns not listed under [columns] can be classified by sampling their
# values. Mode "pattern" uses built-in regex heuristics, "remote" sends
# samples to an NER endpoint, "off" leaves unbound columns untouched.
[classifier]
mode = "pattern"

# Values sampled per column
sample_size = 10

# Matching samples required before a column is bound
min_matches = 5

# Remote mode only. Uncomment and set the endpoint.
# endpoint = "${CLOAK_CLASSIFIER_ENDPOINT}"
# max_concurrency = 4
# timeout_seconds = 30

# Optional TOML file overriding the built-in patterns
# pattern_file = "patterns.toml"

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# Append a JSON line per run with counts, never with mapped values
enabled = false
log_path = "cloak_audit.jsonl"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging
local_enabled = true

# Local log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
