//! Core pseudonymization logic for Cloak.
//!
//! This module contains the engine, the substitution surfaces, and the
//! supporting pool/store machinery.
//!
//! # Modules
//!
//! - [`pool`] - Per-category fake value pools with cursor and used-set
//! - [`store`] - Forward/backward mapping tables and the persisted artifact
//! - [`generator`] - Unique replacement minting with bounded fallback
//! - [`engine`] - The [`engine::Pseudonymizer`] owning store and generator
//! - [`text`] - Free-text masking/unmasking, longest-match and boundary-safe
//! - [`sql`] - SQL-literal masking/unmasking with quote preservation
//! - [`tabular`] - Column-wise masking/deanonymization over JSON rows
//! - [`audit`] - JSON-lines audit trail with hashed values
//!
//! # Anonymization Workflow
//!
//! The typical anonymization run:
//!
//! 1. **Seed or load pools**: built-in fake data providers or a pool file
//! 2. **Bind columns**: configured bindings, optionally classifier-resolved
//! 3. **Mask rows**: [`tabular::anonymize_table`] accumulates mappings
//! 4. **Persist**: the engine writes the mapping artifact and audit record
//! 5. **Mask/unmask downstream**: text and SQL substitution run read-only
//!    over the loaded artifact
//!
//! # Example
//!
//! ```rust
//! use cloak::core::engine::Pseudonymizer;
//! use cloak::core::generator::{FakeValueGenerator, GeneratorSettings};
//! use cloak::core::text::TextSubstituter;
//! use cloak::core::{pool, tabular};
//! use cloak::domain::{ColumnBindings, EntityCategory};
//! use serde_json::json;
//!
//! # fn example() -> cloak::domain::Result<()> {
//! let pools = pool::default_pools(100, Some(7));
//! let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(7));
//! let mut engine = Pseudonymizer::new(generator);
//!
//! let bindings = ColumnBindings::from_pairs(vec![
//!     ("name".to_string(), EntityCategory::Company),
//! ])?;
//! let rows = vec![json!({"name": "infosys", "industry": "it"})];
//! let masked = tabular::anonymize_table(&mut engine, &rows, &bindings)?;
//!
//! let text = TextSubstituter::new(engine.store());
//! assert_eq!(text.unmask(masked[0]["name"].as_str().unwrap()), "infosys");
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod engine;
pub mod generator;
pub mod pool;
pub mod sql;
pub mod store;
pub mod tabular;
pub mod text;
