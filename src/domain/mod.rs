//! Domain models and types for Cloak.
//!
//! This module contains the core domain models, types, and business rules
//! for Cloak: entity categories, column bindings, the tabular row model,
//! and the error hierarchy.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity categories** ([`EntityCategory`]): the closed set of value
//!   classes the engine pseudonymizes
//! - **Column bindings** ([`ColumnBindings`]): which table columns carry
//!   which category
//! - **Row model** ([`table::Row`]): JSON object rows shared by files
//!   and the engine
//! - **Error types** ([`CloakError`], [`ClassifierError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CloakError>`]:
//!
//! ```rust
//! use cloak::domain::{CloakError, Result};
//!
//! fn example() -> Result<()> {
//!     let category: cloak::domain::EntityCategory = "company".parse()?;
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod category;
pub mod errors;
pub mod result;
pub mod table;

// Re-export commonly used types for convenience
pub use binding::ColumnBindings;
pub use category::EntityCategory;
pub use errors::{ClassifierError, CloakError};
pub use result::Result;
pub use table::Row;
