//! External system integrations for Cloak.
//!
//! This module provides adapters between the engine and the outside
//! world:
//!
//! - [`classifier`] - entity classifiers that bind table columns to
//!   categories (offline pattern registry, remote NER service)
//! - [`sql`] - SQL tokenizers that expose statement literals for
//!   substitution
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external
//! dependencies and enable testing with mock implementations. Both
//! seams are trait-based: [`classifier::EntityClassifier`] for column
//! classification and [`sql::SqlTokenizer`] for statement lexing, so
//! the engine never depends on a concrete backend.
//!
//! # Classifier Adapter
//!
//! ```rust,no_run
//! use cloak::adapters::classifier;
//! use cloak::config::ClassifierConfig;
//!
//! # fn example() -> cloak::domain::Result<()> {
//! let config = ClassifierConfig::default();
//! let classifier = classifier::from_config(&config)?;
//! // Submit column samples through the returned classifier
//! # let _ = classifier;
//! # Ok(())
//! # }
//! ```
//!
//! # SQL Adapter
//!
//! ```rust
//! use cloak::adapters::sql::{GenericSqlTokenizer, SqlTokenizer};
//!
//! # fn example() -> cloak::domain::Result<()> {
//! let tokenizer = GenericSqlTokenizer::new();
//! let tokens = tokenizer.tokenize("SELECT * FROM t WHERE name = 'ibm'")?;
//! assert!(!tokens.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod sql;
