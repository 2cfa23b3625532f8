//! Mapping store and persisted artifact
//!
//! The store holds the forward (original to fake) and backward (fake to
//! original) tables, partitioned by entity category. The two directions
//! are always written together. `MappingArtifact` is the persisted form:
//! one pretty-JSON document carrying both tables plus run metadata, with
//! the bijection invariant checked on load.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::category::EntityCategory;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;

type CategoryTables = BTreeMap<EntityCategory, BTreeMap<String, String>>;

/// Bidirectional original/fake tables, one pair per category
#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    forward: CategoryTables,
    backward: CategoryTables,
}

impl MappingStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an original/fake pair in both directions
    ///
    /// Re-recording an identical pair is a no-op. A pair that disagrees
    /// with either table is rejected, since accepting it would break the
    /// bijection.
    pub fn record(
        &mut self,
        category: EntityCategory,
        original: impl Into<String>,
        fake: impl Into<String>,
    ) -> Result<()> {
        let original = original.into();
        let fake = fake.into();

        if let Some(existing) = self.lookup_forward(category, &original) {
            if existing == fake {
                return Ok(());
            }
            return Err(CloakError::MappingConflict(format!(
                "original already mapped to a different fake in category '{category}'"
            )));
        }
        if self.lookup_backward(category, &fake).is_some() {
            return Err(CloakError::MappingConflict(format!(
                "fake value already assigned to another original in category '{category}'"
            )));
        }

        self.forward
            .entry(category)
            .or_default()
            .insert(original.clone(), fake.clone());
        self.backward
            .entry(category)
            .or_default()
            .insert(fake, original);
        Ok(())
    }

    /// Fake assigned to an original, if any
    pub fn lookup_forward(&self, category: EntityCategory, original: &str) -> Option<&str> {
        self.forward
            .get(&category)?
            .get(original)
            .map(String::as_str)
    }

    /// Original behind a fake, if any
    pub fn lookup_backward(&self, category: EntityCategory, fake: &str) -> Option<&str> {
        self.backward.get(&category)?.get(fake).map(String::as_str)
    }

    /// True when the value is a forward key of the category
    pub fn is_original(&self, category: EntityCategory, value: &str) -> bool {
        self.lookup_forward(category, value).is_some()
    }

    /// True when the value is a backward key of the category
    pub fn is_fake(&self, category: EntityCategory, value: &str) -> bool {
        self.lookup_backward(category, value).is_some()
    }

    /// True when the value appears on either side of the category's tables
    ///
    /// The generator uses this to keep minted fakes disjoint from known
    /// originals and from fakes recorded by earlier runs.
    pub fn is_known(&self, category: EntityCategory, value: &str) -> bool {
        self.is_original(category, value) || self.is_fake(category, value)
    }

    /// Forward table of one category
    pub fn forward_table(&self, category: EntityCategory) -> Option<&BTreeMap<String, String>> {
        self.forward.get(&category)
    }

    /// Backward table of one category
    pub fn backward_table(&self, category: EntityCategory) -> Option<&BTreeMap<String, String>> {
        self.backward.get(&category)
    }

    /// Categories holding at least one mapping, in deterministic order
    pub fn categories(&self) -> impl Iterator<Item = EntityCategory> + '_ {
        self.forward
            .iter()
            .filter(|(_, table)| !table.is_empty())
            .map(|(category, _)| *category)
    }

    /// Number of pairs recorded for a category
    pub fn count(&self, category: EntityCategory) -> usize {
        self.forward.get(&category).map_or(0, BTreeMap::len)
    }

    /// Total pairs across all categories
    pub fn total_entries(&self) -> usize {
        self.forward.values().map(BTreeMap::len).sum()
    }

    /// True when no pairs are recorded
    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

/// Audit metadata for one anonymization run
///
/// Consumed by nothing in the masking path; recorded for operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique id for the run that produced the artifact
    pub run_id: Uuid,
    /// When the artifact was produced
    pub timestamp: DateTime<Utc>,
    /// Categories holding at least one mapping
    pub categories_touched: Vec<EntityCategory>,
    /// Pairs recorded per category
    pub per_category_counts: BTreeMap<EntityCategory, usize>,
}

impl RunMetadata {
    /// Captures metadata for the store's current contents
    pub fn from_store(store: &MappingStore) -> Self {
        let categories_touched: Vec<EntityCategory> = store.categories().collect();
        let per_category_counts = categories_touched
            .iter()
            .map(|category| (*category, store.count(*category)))
            .collect();
        Self {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            categories_touched,
            per_category_counts,
        }
    }
}

/// Persisted mapping document
///
/// Both directions are stored even though one could be derived from the
/// other: the document stays greppable in either direction, and the
/// redundancy lets [`MappingArtifact::validate`] detect corruption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingArtifact {
    pub metadata: RunMetadata,
    pub forward_mapping: CategoryTables,
    pub backward_mapping: CategoryTables,
}

impl MappingArtifact {
    /// Snapshots a store into its persistable form
    pub fn from_store(store: &MappingStore) -> Self {
        Self {
            metadata: RunMetadata::from_store(store),
            forward_mapping: store.forward.clone(),
            backward_mapping: store.backward.clone(),
        }
    }

    /// Writes the artifact as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(
            path = %path.display(),
            entries = self.forward_mapping.values().map(BTreeMap::len).sum::<usize>(),
            "Saved mapping artifact"
        );
        Ok(())
    }

    /// Reads an artifact and validates the bijection invariant
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| {
            CloakError::MappingNotFound(format!("{}: {err}", path.display()))
        })?;
        let artifact: MappingArtifact = serde_json::from_str(&contents)?;
        artifact.validate()?;
        debug!(path = %path.display(), "Loaded mapping artifact");
        Ok(artifact)
    }

    /// Checks that the forward and backward tables agree exactly
    ///
    /// Disagreement is always rejected, never repaired: a repaired table
    /// would silently unmask the wrong values.
    pub fn validate(&self) -> Result<()> {
        for (category, forward) in &self.forward_mapping {
            let backward = self.backward_mapping.get(category).ok_or_else(|| {
                CloakError::MappingConflict(format!(
                    "category '{category}' has a forward table but no backward table"
                ))
            })?;
            if forward.len() != backward.len() {
                return Err(CloakError::MappingConflict(format!(
                    "category '{category}' tables disagree: {} forward vs {} backward entries",
                    forward.len(),
                    backward.len()
                )));
            }
            for (original, fake) in forward {
                match backward.get(fake) {
                    Some(reverse) if reverse == original => {}
                    Some(_) => {
                        return Err(CloakError::MappingConflict(format!(
                            "category '{category}' has a fake value pointing back to a different original"
                        )));
                    }
                    None => {
                        return Err(CloakError::MappingConflict(format!(
                            "category '{category}' has a forward entry with no backward counterpart"
                        )));
                    }
                }
            }
        }
        for category in self.backward_mapping.keys() {
            if !self.forward_mapping.contains_key(category) {
                return Err(CloakError::MappingConflict(format!(
                    "category '{category}' has a backward table but no forward table"
                )));
            }
        }
        Ok(())
    }

    /// Consumes the artifact into a usable store
    pub fn into_store(self) -> MappingStore {
        MappingStore {
            forward: self.forward_mapping,
            backward: self.backward_mapping,
        }
    }
}
