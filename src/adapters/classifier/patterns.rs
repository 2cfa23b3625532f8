//! Pattern registry for offline column classification

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::adapters::classifier::{majority_label, EntityClassifier};
use crate::domain::category::EntityCategory;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;

/// One named pattern group from the TOML registry
#[derive(Debug, Clone, Deserialize)]
struct PatternDefinition {
    /// Regex patterns for this group
    patterns: Vec<String>,
    /// Category the group votes for
    category: String,
}

/// Registry file container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Compiled classifier patterns, grouped by category
///
/// The registry only drives column classification; it plays no part in
/// masking itself. Patterns are plain regexes, so the offline classifier
/// is strongest on syntactic categories (emails, phones, URLs) and
/// weakest on bare proper nouns.
pub struct PatternRegistry {
    by_category: HashMap<EntityCategory, Vec<Regex>>,
}

impl PatternRegistry {
    /// Loads a pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CloakError::Configuration(format!(
                "Failed to read pattern registry {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parses a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary = toml::from_str(content)?;

        let mut by_category: HashMap<EntityCategory, Vec<Regex>> = HashMap::new();
        for (name, definition) in library.patterns {
            let category: EntityCategory = definition.category.parse().map_err(|_| {
                CloakError::Configuration(format!(
                    "Invalid category in pattern '{name}': {}",
                    definition.category
                ))
            })?;

            for pattern in &definition.patterns {
                let regex = Regex::new(pattern).map_err(|e| {
                    CloakError::Configuration(format!("Invalid regex in pattern '{name}': {e}"))
                })?;
                by_category.entry(category).or_default().push(regex);
            }
        }

        Ok(Self { by_category })
    }

    /// Built-in default registry
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/classifier_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Patterns registered for a category
    pub fn patterns_for(&self, category: EntityCategory) -> Option<&[Regex]> {
        self.by_category.get(&category).map(|v| v.as_slice())
    }

    /// Categories with at least one registered pattern
    pub fn categories(&self) -> impl Iterator<Item = EntityCategory> + '_ {
        self.by_category.keys().copied()
    }

    /// True when no patterns are registered
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }
}

/// Offline classifier backed by the pattern registry
///
/// Counts pattern hits over the sample and applies the shared majority
/// rule. Works without network access, which makes it the default mode.
pub struct PatternClassifier {
    registry: PatternRegistry,
    min_matches: usize,
}

impl PatternClassifier {
    pub fn new(registry: PatternRegistry, min_matches: usize) -> Self {
        Self {
            registry,
            min_matches,
        }
    }
}

#[async_trait]
impl EntityClassifier for PatternClassifier {
    async fn classify(
        &self,
        samples: &[String],
        candidates: &[EntityCategory],
    ) -> Result<Option<EntityCategory>> {
        let mut counts: HashMap<EntityCategory, usize> = HashMap::new();
        for sample in samples {
            for &category in candidates {
                let regexes = match self.registry.patterns_for(category) {
                    Some(regexes) => regexes,
                    None => continue,
                };
                for regex in regexes {
                    let hits = regex.find_iter(sample).count();
                    if hits > 0 {
                        *counts.entry(category).or_insert(0) += hits;
                    }
                }
            }
        }
        Ok(majority_label(&counts, self.min_matches))
    }
}
