// Cloak - Reversible pseudonymization for rows, text and SQL
// Copyright (c) 2025 Cloak Contributors
// Licensed under the MIT License

//! # Cloak - Reversible Pseudonymization
//!
//! Cloak is a pseudonymization tool built in Rust that replaces sensitive
//! values in tabular data, free text and SQL with consistent synthetic
//! substitutes, and restores the originals on demand from a persisted
//! mapping artifact.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Anonymizing** JSON rows by swapping bound column values for fakes
//! - **Masking** free text and SQL string literals with recorded mappings
//! - **Restoring** originals from the mapping artifact of a prior run
//! - **Classifying** unbound columns by sampling their values
//!
//! ## Architecture
//!
//! Cloak follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (engine, store, generator, substitution)
//! - [`adapters`] - Pluggable pieces (column classifiers, SQL tokenizer)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloak::config::load_config;
//! use cloak::core::engine::Pseudonymizer;
//! use cloak::core::generator::FakeValueGenerator;
//! use cloak::core::{pool, tabular};
//! use serde_json::json;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration and column bindings
//!     let config = load_config("cloak.toml")?;
//!     let bindings = config.column_bindings()?;
//!
//!     // Build the engine from the configured pools
//!     let pools = pool::default_pools(config.pools.size, config.pools.rng_seed);
//!     let generator = FakeValueGenerator::new(pools, config.generator, config.pools.rng_seed);
//!     let mut engine = Pseudonymizer::new(generator);
//!
//!     // Mask the bound columns of every row
//!     let rows = vec![json!({"vendor": "Initech", "website": "https://initech.example"})];
//!     let masked = tabular::anonymize_table(&mut engine, &rows, &bindings)?;
//!
//!     // Persist the artifact that makes the run reversible
//!     let artifact = engine.persist(Path::new("cloak_mappings.json"))?;
//!
//!     println!("Masked {} rows ({} run)", masked.len(), artifact.metadata.run_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! ### Consistent Substitution
//!
//! The same original always maps to the same fake within a run and across
//! extended runs, so joins between masked tables still line up. Mappings
//! live in a [`core::store::MappingStore`] and are persisted as a
//! [`core::store::MappingArtifact`].
//!
//! ### Text and SQL Masking
//!
//! Any text can be masked against a prior run's artifact. Plain text uses
//! longest-match-first substring replacement; SQL masking only rewrites
//! string literals so identifiers and keywords survive:
//!
//! ```rust,no_run
//! use cloak::core::sql::SqlSubstituter;
//! use cloak::core::store::MappingArtifact;
//! use cloak::core::text::TextSubstituter;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MappingArtifact::load(Path::new("cloak_mappings.json"))?.into_store();
//!
//! let text = TextSubstituter::new(&store);
//! let masked = text.mask("Met with Initech about the renewal");
//! assert_eq!(text.unmask(&masked), "Met with Initech about the renewal");
//!
//! let sql = SqlSubstituter::new(&store);
//! let masked = sql.mask("SELECT * FROM deals WHERE vendor = 'Initech'")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Column Classification
//!
//! Columns without an explicit binding can be classified by sampling
//! their values, either with built-in regex heuristics or a remote NER
//! endpoint. See [`adapters::classifier`].
//!
//! ## Error Handling
//!
//! Cloak uses the [`domain::CloakError`] type for all errors:
//!
//! ```rust,no_run
//! use cloak::domain::CloakError;
//!
//! fn example() -> Result<(), CloakError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = cloak::config::load_config("cloak.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Cloak uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(rows = 120, "Anonymization complete");
//! warn!(column = "vendor", "Column has no bound category");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
