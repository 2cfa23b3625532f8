//! Column binding model
//!
//! Associates input table columns with entity categories. Bindings come
//! from configuration or from an entity classifier and drive which cells
//! the tabular operations touch.

use std::collections::BTreeMap;

use crate::domain::category::EntityCategory;
use crate::domain::errors::CloakError;
use crate::domain::result::Result;

/// Mapping of column names to entity categories
///
/// Column name matching is case-insensitive: `"Company"` in the bindings
/// matches a `"company"` key in an input row. The configured spelling is
/// preserved for display and warnings.
///
/// # Examples
///
/// ```
/// use cloak::domain::binding::ColumnBindings;
/// use cloak::domain::category::EntityCategory;
///
/// let bindings = ColumnBindings::from_pairs(vec![
///     ("Company".to_string(), EntityCategory::Company),
/// ]).unwrap();
/// assert_eq!(bindings.category_for("company"), Some(EntityCategory::Company));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnBindings {
    entries: Vec<(String, EntityCategory)>,
}

impl ColumnBindings {
    /// Builds bindings from column/category pairs
    ///
    /// Preserves the given order. Two bindings whose column names differ
    /// only in case are rejected, since lookups could not tell them apart.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, EntityCategory)>) -> Result<Self> {
        let mut entries: Vec<(String, EntityCategory)> = Vec::new();
        for (column, category) in pairs {
            if column.trim().is_empty() {
                return Err(CloakError::Configuration(
                    "Column binding name cannot be empty".to_string(),
                ));
            }
            if entries
                .iter()
                .any(|(existing, _)| existing.eq_ignore_ascii_case(&column))
            {
                return Err(CloakError::Configuration(format!(
                    "Duplicate column binding: {column}"
                )));
            }
            entries.push((column, category));
        }
        Ok(Self { entries })
    }

    /// Looks up the category bound to a column, ignoring case
    pub fn category_for(&self, column: &str) -> Option<EntityCategory> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, category)| *category)
    }

    /// True when the column has a binding, ignoring case
    pub fn contains(&self, column: &str) -> bool {
        self.category_for(column).is_some()
    }

    /// Iterates bindings in configuration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityCategory)> {
        self.entries
            .iter()
            .map(|(name, category)| (name.as_str(), *category))
    }

    /// Bound column names in configuration order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of bound columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no columns are bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Conversion from the raw configuration map form (`column = "category"`)
impl TryFrom<&BTreeMap<String, String>> for ColumnBindings {
    type Error = CloakError;

    fn try_from(raw: &BTreeMap<String, String>) -> Result<Self> {
        let mut pairs = Vec::with_capacity(raw.len());
        for (column, category) in raw {
            let category: EntityCategory = category.parse().map_err(|_| {
                CloakError::Configuration(format!(
                    "Column '{column}' is bound to unknown category '{category}'"
                ))
            })?;
            pairs.push((column.clone(), category));
        }
        Self::from_pairs(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ColumnBindings {
        ColumnBindings::from_pairs(vec![
            ("Company".to_string(), EntityCategory::Company),
            ("contact_email".to_string(), EntityCategory::Email),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_ignores_case() {
        let bindings = sample();
        assert_eq!(
            bindings.category_for("COMPANY"),
            Some(EntityCategory::Company)
        );
        assert_eq!(
            bindings.category_for("Contact_Email"),
            Some(EntityCategory::Email)
        );
        assert_eq!(bindings.category_for("phone"), None);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = ColumnBindings::from_pairs(vec![
            ("company".to_string(), EntityCategory::Company),
            ("Company".to_string(), EntityCategory::Person),
        ]);
        assert!(matches!(result, Err(CloakError::Configuration(_))));
    }

    #[test]
    fn test_empty_column_name_rejected() {
        let result = ColumnBindings::from_pairs(vec![("  ".to_string(), EntityCategory::Url)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_raw_map() {
        let mut raw = BTreeMap::new();
        raw.insert("city".to_string(), "location".to_string());
        raw.insert("vendor".to_string(), "company".to_string());

        let bindings = ColumnBindings::try_from(&raw).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(
            bindings.category_for("vendor"),
            Some(EntityCategory::Company)
        );
    }

    #[test]
    fn test_from_raw_map_unknown_category() {
        let mut raw = BTreeMap::new();
        raw.insert("ssn".to_string(), "social_security".to_string());

        let result = ColumnBindings::try_from(&raw);
        assert!(matches!(result, Err(CloakError::Configuration(_))));
    }

    #[test]
    fn test_preserves_configured_order() {
        let bindings = sample();
        let columns: Vec<&str> = bindings.columns().collect();
        assert_eq!(columns, vec!["Company", "contact_email"]);
    }
}
