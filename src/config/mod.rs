//! Configuration management for Cloak.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Cloak uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`CLOAK_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cloak::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration from file
//! let config = load_config("cloak.toml")?;
//!
//! // Access configuration sections
//! println!("Pool size: {}", config.pools.size);
//! println!("Classifier mode: {}", config.classifier.mode);
//!
//! // Parse the [columns] section into bindings
//! let bindings = config.column_bindings()?;
//! println!("Bound columns: {}", bindings.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! The configuration is organized into sections:
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - `[columns]` - Column bindings (column name to entity category)
//! - [`PoolConfig`] - Fake value pool size, seed, and optional pool file
//! - [`GeneratorSettings`](crate::core::generator::GeneratorSettings) -
//!   Replacement synthesis retries and fallback ceiling
//! - [`ClassifierConfig`] - Column classifier mode and sampling
//! - [`AuditConfig`] - Append-only audit trail
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [columns]
//! vendor = "company"
//! contact_email = "email"
//! city = "location"
//!
//! [pools]
//! size = 1000
//! rng_seed = 42
//!
//! [classifier]
//! mode = "remote"
//! endpoint = "${CLOAK_CLASSIFIER_ENDPOINT}"
//! sample_size = 10
//! min_matches = 5
//!
//! [audit]
//! enabled = true
//! log_path = "cloak_audit.jsonl"
//! ```
//!
//! # Environment Variables
//!
//! Use `${VAR_NAME}` syntax for environment variable substitution:
//!
//! ```bash
//! export CLOAK_CLASSIFIER_ENDPOINT="http://localhost:8080/classify"
//! ```
//!
//! Settings can also be overridden without touching the file, using the
//! `CLOAK_<SECTION>_<KEY>` pattern (for example `CLOAK_POOLS_SIZE=500`).
//!
//! # Validation
//!
//! Configuration is validated on load:
//!
//! ```rust,no_run
//! use cloak::config::load_config;
//!
//! # fn example() {
//! match load_config("cloak.toml") {
//!     Ok(config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuditConfig, ClassifierConfig, CloakConfig, LoggingConfig, PoolConfig,
};
