//! Pseudonymization engine
//!
//! This module provides the core [`Pseudonymizer`] that owns the mapping
//! store and the fake value generator for one anonymization run.
//!
//! # Architecture
//!
//! The engine coordinates three components:
//! - **Mapping store**: the forward/backward tables, always written together
//! - **Generator**: mints unique category-appropriate replacements
//! - **Audit logger**: records completed runs with hashed values
//!
//! There is no shared or process-global state: every run constructs its
//! own engine, and every mutating operation takes `&mut self`, so the
//! borrow checker enforces the single-writer rule structurally.
//!
//! # Examples
//!
//! ```
//! use cloak::core::engine::Pseudonymizer;
//! use cloak::core::generator::{FakeValueGenerator, GeneratorSettings};
//! use cloak::core::pool;
//! use cloak::domain::EntityCategory;
//!
//! # fn example() -> cloak::domain::Result<()> {
//! let pools = pool::default_pools(100, Some(7));
//! let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(7));
//! let mut engine = Pseudonymizer::new(generator);
//!
//! let fake = engine.ensure(EntityCategory::Company, "ibm")?;
//! assert_eq!(engine.ensure(EntityCategory::Company, "ibm")?, fake);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use tracing::debug;

use crate::core::audit::AuditLogger;
use crate::core::generator::FakeValueGenerator;
use crate::core::store::{MappingArtifact, MappingStore};
use crate::domain::category::EntityCategory;
use crate::domain::result::Result;

/// Owns the mapping store and generator for one run
pub struct Pseudonymizer {
    store: MappingStore,
    generator: FakeValueGenerator,
    audit_logger: Option<AuditLogger>,
}

impl Pseudonymizer {
    /// Creates an engine with an empty store
    pub fn new(generator: FakeValueGenerator) -> Self {
        Self {
            store: MappingStore::new(),
            generator,
            audit_logger: None,
        }
    }

    /// Creates an engine over a store loaded from a prior run's artifact
    ///
    /// New assignments extend the existing tables; the generator treats
    /// every value the store already knows as reserved.
    pub fn with_store(store: MappingStore, generator: FakeValueGenerator) -> Self {
        Self {
            store,
            generator,
            audit_logger: None,
        }
    }

    /// Attaches an audit logger consulted by [`persist`](Self::persist)
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Returns the fake for an original, minting and recording one if absent
    ///
    /// Lookup, mint, and the double-table write happen inside this one
    /// `&mut self` call, so no two lookups can race to mint different
    /// fakes for the same original.
    pub fn ensure(&mut self, category: EntityCategory, original: &str) -> Result<String> {
        if let Some(fake) = self.store.lookup_forward(category, original) {
            return Ok(fake.to_string());
        }

        let fake = self.generator.mint(category, &self.store)?;
        self.store.record(category, original, fake.clone())?;
        debug!(category = %category, "Minted new mapping");
        Ok(fake)
    }

    /// True when the category can mint values
    pub fn has_pool(&self, category: EntityCategory) -> bool {
        self.generator.has_pool(category)
    }

    /// Read access to the accumulated mappings
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Consumes the engine, yielding its store
    pub fn into_store(self) -> MappingStore {
        self.store
    }

    /// Persists the run's mappings and appends the audit record
    ///
    /// The artifact is written before the audit entry; a failure in
    /// either propagates so the caller never reports a run complete with
    /// an unwritten trail.
    pub fn persist(&self, path: &Path) -> Result<MappingArtifact> {
        let artifact = MappingArtifact::from_store(&self.store);
        artifact.save(path)?;

        if let Some(ref logger) = self.audit_logger {
            logger.record_run(&artifact.metadata, &self.store)?;
        }

        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::GeneratorSettings;
    use crate::core::pool::FakeValuePool;
    use std::collections::BTreeMap;

    fn engine_with(category: EntityCategory, values: &[&str]) -> Pseudonymizer {
        let mut pools = BTreeMap::new();
        pools.insert(
            category,
            FakeValuePool::new(values.iter().map(|v| v.to_string()).collect()),
        );
        let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(3));
        Pseudonymizer::new(generator)
    }

    #[test]
    fn test_ensure_is_stable_per_original() {
        let mut engine = engine_with(EntityCategory::Company, &["Hayes Group", "Ortiz LLC"]);

        let first = engine.ensure(EntityCategory::Company, "ibm").unwrap();
        let second = engine.ensure(EntityCategory::Company, "ibm").unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.store().count(EntityCategory::Company), 1);
    }

    #[test]
    fn test_distinct_originals_get_distinct_fakes() {
        let mut engine = engine_with(EntityCategory::Company, &["Hayes Group", "Ortiz LLC"]);

        let a = engine.ensure(EntityCategory::Company, "ibm").unwrap();
        let b = engine.ensure(EntityCategory::Company, "infosys").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ensure_records_both_directions() {
        let mut engine = engine_with(EntityCategory::Company, &["Hayes Group"]);

        let fake = engine.ensure(EntityCategory::Company, "ibm").unwrap();
        assert_eq!(
            engine.store().lookup_backward(EntityCategory::Company, &fake),
            Some("ibm")
        );
    }

    #[test]
    fn test_with_store_extends_prior_run() {
        let mut first = engine_with(EntityCategory::Company, &["Hayes Group", "Ortiz LLC"]);
        let fake = first.ensure(EntityCategory::Company, "ibm").unwrap();
        let store = first.into_store();

        let mut pools = BTreeMap::new();
        pools.insert(
            EntityCategory::Company,
            FakeValuePool::new(vec!["Hayes Group".to_string(), "Ortiz LLC".to_string()]),
        );
        let generator = FakeValueGenerator::new(pools, GeneratorSettings::default(), Some(3));
        let mut second = Pseudonymizer::with_store(store, generator);

        // existing mapping survives, new originals avoid prior fakes
        assert_eq!(second.ensure(EntityCategory::Company, "ibm").unwrap(), fake);
        let minted = second.ensure(EntityCategory::Company, "wipro").unwrap();
        assert_ne!(minted, fake);
    }

    #[test]
    fn test_persist_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");

        let mut engine = engine_with(EntityCategory::Company, &["Hayes Group"]);
        engine.ensure(EntityCategory::Company, "ibm").unwrap();

        let artifact = engine.persist(&path).unwrap();
        assert!(path.exists());
        assert_eq!(artifact.metadata.categories_touched, vec![EntityCategory::Company]);

        let reloaded = MappingArtifact::load(&path).unwrap();
        assert_eq!(reloaded.forward_mapping, artifact.forward_mapping);
    }

    #[test]
    fn test_persist_appends_audit_record() {
        let dir = tempfile::tempdir().unwrap();
        let artifact_path = dir.path().join("mappings.json");
        let audit_path = dir.path().join("cloak_audit.log");

        let logger = AuditLogger::new(audit_path.clone(), true).unwrap();
        let mut engine =
            engine_with(EntityCategory::Company, &["Hayes Group"]).with_audit_logger(logger);
        engine.ensure(EntityCategory::Company, "ibm").unwrap();
        engine.persist(&artifact_path).unwrap();

        let audit = std::fs::read_to_string(&audit_path).unwrap();
        assert!(audit.contains("company"));
        assert!(!audit.contains("ibm"));
    }
}
